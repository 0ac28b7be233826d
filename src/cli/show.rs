//! hausplan show command implementation
//!
//! Renders all three views as text, the same way the interactive UI lays
//! them out.

use super::Session;
use crate::error::Result;
use crate::output::emit_success;

/// Options for `hausplan show`
pub struct ShowOptions {
    pub search: Option<String>,
}

pub fn run(session: &Session, options: ShowOptions) -> Result<()> {
    let mut controller = session.controller();
    if let Some(search) = options.search {
        controller.set_search(search);
    }

    if session.output.json || session.output.quiet {
        return emit_success(session.output, "show", controller.projections(), None);
    }

    println!("{}", controller.surface().text());
    Ok(())
}

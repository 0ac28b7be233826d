//! Interactive terminal UI
//!
//! Three panes (members, new-task form with participant picker, task list)
//! painted through `TuiSurface`, so every change goes through the same
//! controller and render rules as the CLI.

mod app;
mod view;

pub use app::{App, TuiSurface};

use crate::cli::Session;
use crate::error::Result;
use crate::store::StateStore;

/// Open the household data of `session` in the terminal UI
pub fn run(session: &Session) -> Result<()> {
    let store = StateStore::open(session.persistence());
    app::run(store)
}

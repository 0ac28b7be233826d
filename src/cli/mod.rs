//! Command-line interface for hausplan
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand group is implemented in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::controller::{Controller, Outcome};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::prompt::{AlertLog, AutoConfirm, Confirm, TerminalPrompt};
use crate::render::TextSurface;
use crate::storage::{FileStore, Persistence};
use crate::store::StateStore;

mod member;
mod show;
mod task;

/// hausplan - who did which chore, and when
///
/// Keeps a list of household members and a log of chores with the members
/// who took part.
#[derive(Parser, Debug)]
#[command(name = "hausplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the household data
    #[arg(long, global = true, env = "HAUSPLAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, env = "HAUSPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Household members
    #[command(subcommand)]
    Member(MemberCommands),

    /// Recorded chores
    #[command(subcommand)]
    Task(TaskCommands),

    /// Print members, participant picker and tasks
    Show {
        /// Filter the participant picker by name
        #[arg(long)]
        search: Option<String>,
    },

    /// Interactive terminal UI
    Ui,
}

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a member
    Add {
        /// Display name
        name: String,
    },

    /// Remove a member; tasks keep their other participants
    Rm {
        /// Member id, id prefix or name
        member: String,
    },

    /// List members sorted by name
    Ls,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Record a task
    Add {
        /// What was done
        title: String,

        /// Day it was done (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Participating member (repeatable)
        #[arg(long = "with", value_name = "MEMBER")]
        with: Vec<String>,
    },

    /// Delete a task
    Rm {
        /// Task id, id prefix or title
        task: String,
    },

    /// List tasks, most recent first
    Ls,

    /// Replace the participants of a task; no --with clears them
    Assign {
        /// Task id, id prefix or title
        task: String,

        /// Participating member (repeatable)
        #[arg(long = "with", value_name = "MEMBER")]
        with: Vec<String>,
    },
}

/// Settings shared by every command that touches the data
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub data_dir: PathBuf,
    pub output: OutputOptions,
    pub assume_yes: bool,
}

impl Session {
    pub fn resolve(
        config_path: Option<&Path>,
        data_dir: Option<&Path>,
        output: OutputOptions,
        yes: bool,
    ) -> Result<Self> {
        let config = Config::resolve(config_path)?;
        let data_dir = config.data_dir(data_dir);
        let assume_yes = yes || config.prompt.assume_yes;
        tracing::debug!(data_dir = %data_dir.display(), key = %config.storage.key, "session resolved");
        Ok(Self {
            config,
            data_dir,
            output,
            assume_yes,
        })
    }

    pub fn persistence(&self) -> Persistence<FileStore> {
        Persistence::new(
            FileStore::new(self.data_dir.clone()),
            self.config.storage.key.clone(),
        )
    }

    /// Hydrate the store and wire a controller painting into text
    pub fn controller(&self) -> Controller<Persistence<FileStore>, TextSurface> {
        let confirm: Box<dyn Confirm> = if self.assume_yes {
            Box::new(AutoConfirm(true))
        } else {
            Box::new(TerminalPrompt)
        };
        Controller::new(
            StateStore::open(self.persistence()),
            TextSurface::new(),
            confirm,
            Box::new(AlertLog::new()),
        )
    }
}

/// Turn a rejected action into the error it reported
fn rejection(outcome: Outcome) -> Result<Outcome> {
    match outcome {
        Outcome::Rejected(rejection) => Err(rejection.into_error()),
        other => Ok(other),
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let session = Session::resolve(
            self.config.as_deref(),
            self.data_dir.as_deref(),
            output,
            self.yes,
        )?;

        match self.command {
            Commands::Member(cmd) => match cmd {
                MemberCommands::Add { name } => member::run_add(&session, member::AddOptions { name }),
                MemberCommands::Rm { member } => {
                    member::run_rm(&session, member::RmOptions { reference: member })
                }
                MemberCommands::Ls => member::run_ls(&session),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    date,
                    notes,
                    with,
                } => task::run_add(
                    &session,
                    task::AddOptions {
                        title,
                        date,
                        notes,
                        with,
                    },
                ),
                TaskCommands::Rm { task } => task::run_rm(&session, task::RmOptions { reference: task }),
                TaskCommands::Ls => task::run_ls(&session),
                TaskCommands::Assign { task, with } => task::run_assign(
                    &session,
                    task::AssignOptions {
                        reference: task,
                        with,
                    },
                ),
            },
            Commands::Show { search } => show::run(&session, show::ShowOptions { search }),
            Commands::Ui => crate::ui::run(&session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Rejection;

    #[test]
    fn rejection_maps_to_typed_errors() {
        let err = rejection(Outcome::Rejected(Rejection::NoMembers)).expect_err("rejected");
        assert!(matches!(err, Error::NoMembers));

        let err = rejection(Outcome::Rejected(Rejection::MissingTitleOrDate))
            .expect_err("rejected");
        assert!(matches!(err, Error::MissingTitleOrDate));
        assert_eq!(err.exit_code(), crate::error::exit_codes::USER_ERROR);

        let err = rejection(Outcome::Rejected(Rejection::Failed("disk full".to_string())))
            .expect_err("rejected");
        assert!(matches!(err, Error::OperationFailed(message) if message == "disk full"));

        assert_eq!(rejection(Outcome::Cancelled).expect("passes"), Outcome::Cancelled);
    }

    #[test]
    fn cli_parses_repeatable_with() {
        let cli = Cli::try_parse_from([
            "hausplan", "task", "add", "Trash", "--with", "Anna", "--with", "Ben", "--json",
        ])
        .expect("parse");
        assert!(cli.json);
        match cli.command {
            Commands::Task(TaskCommands::Add { title, with, date, .. }) => {
                assert_eq!(title, "Trash");
                assert_eq!(with, vec!["Anna".to_string(), "Ben".to_string()]);
                assert!(date.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! hausplan - household chore tracker
//!
//! Keeps a list of household members and a log of chores (tasks) with the
//! members who took part, and renders both as member, participant picker
//! and task views.
//!
//! # Core Concepts
//!
//! - **State**: members and tasks, persisted as one JSON blob under a key
//! - **Projections**: pure functions from state to display-ready views
//! - **Surfaces**: anything that can paint the views (text, terminal UI)
//! - **Controller**: maps user actions to store mutations and repaints
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `controller`: User actions, confirmation and re-rendering
//! - `error`: Error types and result aliases
//! - `id`: Record identifiers
//! - `locale`: Name collation, search matching and date labels
//! - `lock`: File locking and atomic writes
//! - `model`: Members, tasks and the persisted state
//! - `output`: Human and JSON command output
//! - `projection`: Derived views
//! - `prompt`: Confirm and alert collaborators
//! - `render`: Surfaces and the render synchronizer
//! - `storage`: Key-value stores and the persistence adapter
//! - `store`: The state store and its mutations
//! - `transient`: Unsaved input and selections
//! - `ui`: Terminal UI

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod id;
pub mod locale;
pub mod lock;
pub mod model;
pub mod output;
pub mod projection;
pub mod prompt;
pub mod render;
pub mod storage;
pub mod store;
pub mod transient;
pub mod ui;

pub use error::{Error, Result};

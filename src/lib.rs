//! todo - terminal task list library
//!
//! This library provides the core functionality for the `todo` CLI: an
//! ordered checklist kept in a plain-text file, with a persistent
//! snapshot-based undo/redo history.
//!
//! # Core Concepts
//!
//! - **Task file**: one `- [ ] title` / `- [x] title` line per task
//! - **History**: bounded log of full-list snapshots, one per mutation
//! - **Controller**: [`app::TodoApp`] applies edits, saves, and records them
//!
//! # Module Organization
//!
//! - `task`: Task value type and list helpers
//! - `codec`: Checklist text encoding and decoding
//! - `store`: Task file persistence
//! - `history`: Undo/redo log and its JSON document
//! - `app`: Task list controller
//! - `config`: Configuration loading from `config.toml`
//! - `atomic`: Atomic file writes
//! - `output`: Human and JSON output for CLI commands
//! - `cli`: Command-line interface using clap
//! - `ui`: Interactive terminal front end
//! - `error`: Error types and result aliases

pub mod app;
pub mod atomic;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod output;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};

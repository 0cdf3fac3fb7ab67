//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros. With no
//! subcommand the interactive task list opens; each subcommand applies one
//! controller operation and exits.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::app::TodoApp;
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

mod history;
mod task;

/// Name of the default data directory under the user's home
pub const DEFAULT_DATA_DIR: &str = ".todo-cli";

/// todo - terminal task list
///
/// Keeps an ordered checklist in a plain-text file and remembers every change
/// so it can be undone, even after a restart.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task file, history, and config
    #[arg(long, global = true, env = "TODO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive task list (default)
    Ui,

    /// Print all tasks
    #[command(alias = "ls")]
    List,

    /// Append a new task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Toggle completion of a task
    #[command(alias = "done")]
    Toggle {
        /// Task index as shown by `todo list`
        index: usize,
    },

    /// Change the title of a task
    Edit {
        /// Task index as shown by `todo list`
        index: usize,

        /// New title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task index as shown by `todo list`
        index: usize,
    },

    /// Move a task one position up
    Up {
        /// Task index as shown by `todo list`
        index: usize,
    },

    /// Move a task one position down
    Down {
        /// Task index as shown by `todo list`
        index: usize,
    },

    /// Put incomplete tasks ahead of completed ones
    Sort,

    /// Undo the last change
    Undo,

    /// Redo the last undone change
    Redo,

    /// Show recorded changes, newest first
    History {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let data_dir = resolve_data_dir(self.data_dir.as_deref())?;
        let config = Config::load_from_dir(&data_dir);
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        let open = || TodoApp::open(&data_dir, &config);

        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => crate::ui::run(open(), &config),
            Commands::List => task::run_list(&mut open(), output),
            Commands::Add { title } => task::run_add(&mut open(), &title.join(" "), output),
            Commands::Toggle { index } => task::run_toggle(&mut open(), index, output),
            Commands::Edit { index, title } => {
                task::run_edit(&mut open(), index, &title.join(" "), output)
            }
            Commands::Rm { index } => task::run_rm(&mut open(), index, output),
            Commands::Up { index } => {
                task::run_move(&mut open(), index, task::Direction::Up, output)
            }
            Commands::Down { index } => {
                task::run_move(&mut open(), index, task::Direction::Down, output)
            }
            Commands::Sort => task::run_sort(&mut open(), output),
            Commands::Undo => history::run_undo(&mut open(), output),
            Commands::Redo => history::run_redo(&mut open(), output),
            Commands::History { limit } => history::run_history(&open(), limit, output),
            Commands::Config => run_config(&data_dir, &config, output),
        }
    }

    /// True when this invocation will take over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui))
    }
}

/// Resolve and create the data directory: explicit flag or `TODO_DATA_DIR`,
/// else `~/.todo-cli`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn default_data_dir() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().ok_or_else(|| {
        Error::InvalidConfig("cannot determine home directory; pass --data-dir".to_string())
    })?;
    Ok(base.home_dir().join(DEFAULT_DATA_DIR))
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    data_dir: &'a Path,
    config_file: PathBuf,
    tasks_file: PathBuf,
    history_file: PathBuf,
    config: &'a Config,
}

fn run_config(data_dir: &Path, config: &Config, output: OutputOptions) -> Result<()> {
    let report = ConfigReport {
        data_dir,
        config_file: data_dir.join(CONFIG_FILE),
        tasks_file: config.tasks_path(data_dir),
        history_file: config.history_path(data_dir),
        config,
    };

    let mut human = HumanOutput::new("Configuration");
    human.push_summary("data dir", data_dir.display().to_string());
    human.push_summary("config file", report.config_file.display().to_string());
    human.push_summary("tasks file", report.tasks_file.display().to_string());
    human.push_summary("history file", report.history_file.display().to_string());
    human.push_summary("history.max_entries", config.history.max_entries.to_string());
    human.push_summary("ui.show_help", config.ui.show_help.to_string());
    human.push_summary("ui.confirm_delete", config.ui.confirm_delete.to_string());

    emit_success(output, "config", &report, Some(&human))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["todo", "add", "buy", "milk", "--json", "--data-dir", "/tmp/x"])
            .expect("parse");
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Some(Commands::Add { title }) => assert_eq!(title.join(" "), "buy milk"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["todo"]).expect("parse");
        assert!(cli.is_interactive());

        let cli = Cli::try_parse_from(["todo", "list"]).expect("parse");
        assert!(!cli.is_interactive());
    }

    #[test]
    fn index_must_be_numeric() {
        assert!(Cli::try_parse_from(["todo", "toggle", "first"]).is_err());
        assert!(Cli::try_parse_from(["todo", "rm", "-1"]).is_err());
    }

    #[test]
    fn resolve_data_dir_creates_explicit_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("nested/data");
        let resolved = resolve_data_dir(Some(&dir)).expect("resolve");
        assert_eq!(resolved, dir);
        assert!(dir.is_dir());
    }
}

//! todo - terminal task list
//!
//! Keeps an ordered checklist in a plain-text file with persistent undo and
//! redo. Runs the interactive list by default, or one subcommand per call.

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use todo::cli::{resolve_data_dir, Cli};
use todo::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file used while the terminal is taken over by the interactive list
const LOG_FILE: &str = "todo.log";

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    init_tracing(&cli);

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}

// Tracing is opt-in via RUST_LOG.
// Keep startup robust in scripted envs: ignore invalid/huge filters.
fn env_filter() -> Option<EnvFilter> {
    std::env::var("RUST_LOG").ok().and_then(|raw| {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 4096 {
            return None;
        }
        EnvFilter::try_new(raw).ok()
    })
}

fn init_tracing(cli: &Cli) {
    let Some(filter) = env_filter() else {
        return;
    };

    if cli.is_interactive() {
        // stderr belongs to the alternate screen; log to a file instead
        let file = resolve_data_dir(cli.data_dir.as_deref())
            .ok()
            .and_then(|dir| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join(LOG_FILE))
                    .ok()
            });
        if let Some(file) = file {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .with(filter)
                .init();
        }
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

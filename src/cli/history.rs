//! todo undo, redo and history commands.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::app::TodoApp;
use crate::error::{Error, Result};
use crate::history::Action;
use crate::output::{emit_success, format_task, HumanOutput, OutputOptions};
use crate::task::Task;

#[derive(Serialize)]
struct StepOutput<'a> {
    can_undo: bool,
    can_redo: bool,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct HistoryEntryOutput {
    #[serde(rename = "type")]
    action_type: &'static str,
    timestamp: i64,
    tasks: usize,
}

#[derive(Serialize)]
struct HistoryOutput {
    max_entries: usize,
    total: usize,
    undone: usize,
    entries: Vec<HistoryEntryOutput>,
}

pub fn run_undo(app: &mut TodoApp, output: OutputOptions) -> Result<()> {
    if !app.undo() {
        return Err(Error::NothingToUndo);
    }
    emit_step(app, "undo", "Undid last change", output)
}

pub fn run_redo(app: &mut TodoApp, output: OutputOptions) -> Result<()> {
    if !app.redo() {
        return Err(Error::NothingToRedo);
    }
    emit_step(app, "redo", "Redid last undone change", output)
}

pub fn run_history(app: &TodoApp, limit: usize, output: OutputOptions) -> Result<()> {
    let history = app.history();
    let entries: Vec<HistoryEntryOutput> = history
        .entries()
        .iter()
        .rev()
        .take(limit)
        .map(entry_output)
        .collect();

    let data = HistoryOutput {
        max_entries: history.max_entries(),
        total: history.entries().len(),
        undone: history.undone_entries().len(),
        entries,
    };

    let mut human = HumanOutput::new("History");
    human.push_summary(
        "entries",
        format!("{} of {}", data.total, data.max_entries),
    );
    if data.undone > 0 {
        human.push_summary("redo available", data.undone.to_string());
    }
    for (entry, action) in data.entries.iter().zip(history.entries().iter().rev()) {
        human.push_detail(format!(
            "{}  {:<9} {} tasks",
            format_timestamp(action),
            entry.action_type,
            entry.tasks
        ));
    }

    emit_success(output, "history", &data, Some(&human))
}

fn emit_step(
    app: &mut TodoApp,
    command: &str,
    header: &str,
    output: OutputOptions,
) -> Result<()> {
    let warning = app.take_warning();

    let mut human = HumanOutput::new(header);
    if app.is_empty() {
        human.push_detail("No tasks");
    }
    for task in app.tasks() {
        human.push_detail(format_task(task));
    }
    if let Some(warning) = warning {
        human.push_warning(warning);
    }

    let data = StepOutput {
        can_undo: app.history().can_undo(),
        can_redo: app.history().can_redo(),
        tasks: app.tasks(),
    };
    emit_success(output, command, &data, Some(&human))
}

fn entry_output(action: &Action) -> HistoryEntryOutput {
    HistoryEntryOutput {
        action_type: action.action_type.as_str(),
        timestamp: action.timestamp,
        tasks: action.tasks.len(),
    }
}

fn format_timestamp(action: &Action) -> String {
    match DateTime::<Utc>::from_timestamp(action.timestamp, 0) {
        Some(time) => time
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => action.timestamp.to_string(),
    }
}

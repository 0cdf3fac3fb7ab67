//! todo task command implementations.

use serde::Serialize;

use crate::app::TodoApp;
use crate::error::{Error, Result};
use crate::output::{emit_success, format_task, HumanOutput, OutputOptions};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn command(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    completed: usize,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct TaskChangeOutput<'a> {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<&'a Task>,
    tasks: &'a [Task],
}

pub fn run_list(app: &mut TodoApp, output: OutputOptions) -> Result<()> {
    let warning = app.take_warning();
    let tasks = app.tasks();
    let completed = tasks.iter().filter(|task| task.completed).count();

    let mut human = if tasks.is_empty() {
        HumanOutput::new("No tasks")
    } else {
        HumanOutput::new("Tasks")
    };
    if !tasks.is_empty() {
        human.push_summary("Total", tasks.len().to_string());
        human.push_summary("Done", completed.to_string());
        for task in tasks {
            human.push_detail(format_task(task));
        }
    }
    if let Some(warning) = warning {
        human.push_warning(warning);
    }

    let data = TaskListOutput {
        total: tasks.len(),
        completed,
        tasks,
    };
    emit_success(output, "list", &data, Some(&human))
}

pub fn run_add(app: &mut TodoApp, title: &str, output: OutputOptions) -> Result<()> {
    let Some(task) = app.add_task(title) else {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    };

    let mut human = HumanOutput::new(format!("Added task {}", task.id));
    human.push_detail(format_task(&task));
    emit_change(app, "add", Some(task.id), human, output)
}

pub fn run_toggle(app: &mut TodoApp, index: usize, output: OutputOptions) -> Result<()> {
    ensure_index(app, index)?;
    app.toggle_task(index);

    let state = match app.task(index) {
        Some(task) if task.completed => "done",
        _ => "not done",
    };
    let mut human = HumanOutput::new(format!("Marked task {index} {state}"));
    push_task_detail(&mut human, app, index);
    emit_change(app, "toggle", Some(index), human, output)
}

pub fn run_edit(app: &mut TodoApp, index: usize, title: &str, output: OutputOptions) -> Result<()> {
    ensure_index(app, index)?;
    if !app.edit_task(index, title) {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let mut human = HumanOutput::new(format!("Edited task {index}"));
    push_task_detail(&mut human, app, index);
    emit_change(app, "edit", Some(index), human, output)
}

pub fn run_rm(app: &mut TodoApp, index: usize, output: OutputOptions) -> Result<()> {
    ensure_index(app, index)?;
    let title = app
        .task(index)
        .map(|task| task.title.clone())
        .unwrap_or_default();
    app.delete_task(index);

    let mut human = HumanOutput::new(format!("Deleted task {index}"));
    human.push_summary("title", title);
    emit_change(app, "rm", None, human, output)
}

pub fn run_move(
    app: &mut TodoApp,
    index: usize,
    direction: Direction,
    output: OutputOptions,
) -> Result<()> {
    ensure_index(app, index)?;
    let (moved, target) = match direction {
        Direction::Up => (app.move_up(index), index.checked_sub(1)),
        Direction::Down => (app.move_down(index), Some(index + 1)),
    };
    let target = match (moved, target) {
        (true, Some(target)) => target,
        _ => {
            let edge = match direction {
                Direction::Up => "top",
                Direction::Down => "bottom",
            };
            return Err(Error::InvalidArgument(format!(
                "task {index} is already at the {edge}"
            )));
        }
    };

    let mut human = HumanOutput::new(format!("Moved task {index} to {target}"));
    push_task_detail(&mut human, app, target);
    emit_change(app, direction.command(), Some(target), human, output)
}

pub fn run_sort(app: &mut TodoApp, output: OutputOptions) -> Result<()> {
    let header = if app.sort_tasks() {
        "Sorted tasks"
    } else {
        "Already sorted"
    };

    let mut human = HumanOutput::new(header);
    for task in app.tasks() {
        human.push_detail(format_task(task));
    }
    emit_change(app, "sort", None, human, output)
}

fn ensure_index(app: &TodoApp, index: usize) -> Result<()> {
    if index >= app.len() {
        return Err(Error::IndexOutOfRange {
            index,
            len: app.len(),
        });
    }
    Ok(())
}

fn push_task_detail(human: &mut HumanOutput, app: &TodoApp, index: usize) {
    if let Some(task) = app.task(index) {
        human.push_detail(format_task(task));
    }
}

fn emit_change(
    app: &mut TodoApp,
    action: &'static str,
    index: Option<usize>,
    mut human: HumanOutput,
    output: OutputOptions,
) -> Result<()> {
    if let Some(warning) = app.take_warning() {
        human.push_warning(warning);
    }
    let data = TaskChangeOutput {
        action,
        index,
        task: index.and_then(|index| app.task(index)),
        tasks: app.tasks(),
    };
    emit_success(output, action, &data, Some(&human))
}

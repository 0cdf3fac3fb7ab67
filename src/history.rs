//! Snapshot-based undo/redo log.
//!
//! Every mutation of the task list appends an [`Action`] holding a value copy
//! of the whole list. Undo moves the newest action onto a redo stack and
//! hands back the snapshot that is now newest; redo moves it back.
//!
//! ```text
//! record: push(done, snapshot); clear(undone)
//! undo:   push(undone, pop(done))
//! redo:   push(done, pop(undone))
//! ```
//!
//! Both stacks are persisted together as one JSON document, rewritten after
//! every change. Persistence is best-effort: the in-memory log stays
//! authoritative and write failures are reported through `tracing` and
//! [`HistoryLog::take_warning`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atomic;
use crate::task::{renumber, Task};

/// Upper bound on retained actions
pub const MAX_HISTORY: usize = 100;

/// File name of the history document inside the data directory
pub const HISTORY_FILE: &str = ".todo_history.json";

/// Kind of mutation an action was recorded for. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Init,
    Add,
    Delete,
    Toggle,
    Edit,
    MoveUp,
    MoveDown,
    Sort,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Init => "init",
            ActionType::Add => "add",
            ActionType::Delete => "delete",
            ActionType::Toggle => "toggle",
            ActionType::Edit => "edit",
            ActionType::MoveUp => "move_up",
            ActionType::MoveDown => "move_down",
            ActionType::Sort => "sort",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable copy of every task at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Task>);

impl Snapshot {
    /// Copy the given tasks by value.
    pub fn capture(tasks: &[Task]) -> Self {
        Self(tasks.to_vec())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.0
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Fresh tasks with ids reassigned by position. Stored ids are ignored.
    pub fn materialize(&self) -> Vec<Task> {
        let mut tasks = self.0.clone();
        renumber(&mut tasks);
        tasks
    }
}

/// One recorded mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Unix seconds
    pub timestamp: i64,
    pub tasks: Snapshot,
}

impl Action {
    pub fn new(action_type: ActionType, tasks: &[Task]) -> Self {
        Self {
            action_type,
            timestamp: Utc::now().timestamp(),
            tasks: Snapshot::capture(tasks),
        }
    }
}

/// On-disk layout of the history file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub undone_actions: Vec<Action>,
}

/// Bounded undo log plus redo buffer
#[derive(Debug)]
pub struct HistoryLog {
    path: Option<PathBuf>,
    max_entries: usize,
    done: Vec<Action>,
    undone: Vec<Action>,
    warning: Option<String>,
}

impl HistoryLog {
    /// Open the history stored at `path`. A missing file starts empty; an
    /// unreadable or unparsable one is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        let path = path.into();
        let max_entries = clamp_max_entries(max_entries);
        let (done, undone) = load_history(&path);

        let mut log = Self {
            path: Some(path),
            max_entries,
            done,
            undone,
            warning: None,
        };
        log.evict_overflow();
        log
    }

    /// A log that is never written to disk.
    pub fn in_memory(max_entries: usize) -> Self {
        Self {
            path: None,
            max_entries: clamp_max_entries(max_entries),
            done: Vec::new(),
            undone: Vec::new(),
            warning: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Recorded actions, oldest first.
    pub fn entries(&self) -> &[Action] {
        &self.done
    }

    /// Undone actions, most recently undone last.
    pub fn undone_entries(&self) -> &[Action] {
        &self.undone
    }

    /// Newest recorded action.
    pub fn latest(&self) -> Option<&Action> {
        self.done.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Append a snapshot of `tasks`, discarding the redo buffer.
    pub fn record(&mut self, action_type: ActionType, tasks: &[Task]) {
        self.undone.clear();
        self.done.push(Action::new(action_type, tasks));
        self.evict_overflow();
        debug!(action = %action_type, tasks = tasks.len(), depth = self.done.len(), "recorded history");
        self.persist();
    }

    /// Step back one action.
    ///
    /// Returns `None` when there is nothing to undo. Otherwise returns the
    /// list as of the action that is now newest, or an empty list if the log
    /// has been emptied.
    pub fn undo(&mut self) -> Option<Vec<Task>> {
        let last = self.done.pop()?;
        debug!(action = %last.action_type, "undo");
        self.undone.push(last);
        self.persist();

        Some(
            self.done
                .last()
                .map(|action| action.tasks.materialize())
                .unwrap_or_default(),
        )
    }

    /// Re-apply the most recently undone action.
    ///
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Vec<Task>> {
        let action = self.undone.pop()?;
        debug!(action = %action.action_type, "redo");
        let tasks = action.tasks.materialize();
        self.done.push(action);
        self.persist();
        Some(tasks)
    }

    /// Most recent persistence failure, if any, clearing it.
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    fn evict_overflow(&mut self) {
        if self.done.len() > self.max_entries {
            let excess = self.done.len() - self.max_entries;
            self.done.drain(..excess);
        }
    }

    fn persist(&mut self) {
        let Some(path) = self.path.as_ref() else {
            return;
        };

        let document = HistoryFileRef {
            actions: &self.done,
            undone_actions: &self.undone,
        };

        let result = serde_json::to_vec(&document)
            .map_err(crate::error::Error::from)
            .and_then(|json| atomic::write_atomic(path, &json));

        if let Err(err) = result {
            warn!(path = %path.display(), error = %err, "failed to save history");
            self.warning = Some(format!("history not saved: {err}"));
        }
    }
}

#[derive(Serialize)]
struct HistoryFileRef<'a> {
    actions: &'a [Action],
    undone_actions: &'a [Action],
}

fn clamp_max_entries(max_entries: usize) -> usize {
    max_entries.clamp(1, MAX_HISTORY)
}

fn load_history(path: &Path) -> (Vec<Action>, Vec<Action>) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return (Vec::new(), Vec::new());
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read history, starting empty");
            return (Vec::new(), Vec::new());
        }
    };

    match serde_json::from_str::<HistoryFile>(&content) {
        Ok(file) => {
            debug!(
                path = %path.display(),
                actions = file.actions.len(),
                undone = file.undone_actions.len(),
                "loaded history"
            );
            (file.actions, file.undone_actions)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to parse history, starting empty");
            (Vec::new(), Vec::new())
        }
    }
}

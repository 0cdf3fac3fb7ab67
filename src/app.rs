//! Task list controller.
//!
//! [`TodoApp`] owns the live task list. Every mutation renumbers the list,
//! writes the task file, and records a snapshot of the resulting list in the
//! [`HistoryLog`]. Because the newest history entry always equals the live
//! list, undo (drop the newest entry, show the one below) and redo (push it
//! back) are exact inverses.
//!
//! Invalid indices and blank titles are no-ops reported through the return
//! value. Persistence failures never fail an operation; they are logged and
//! kept for [`TodoApp::take_warning`].

use tracing::{debug, warn};

use crate::config::Config;
use crate::history::{ActionType, HistoryLog};
use crate::store::TaskStore;
use crate::task::{normalize_title, renumber, sort_incomplete_first, Task};

pub struct TodoApp {
    tasks: Vec<Task>,
    store: TaskStore,
    history: HistoryLog,
    warning: Option<String>,
}

impl TodoApp {
    /// Load tasks from `store`, put incomplete tasks first, and record the
    /// result as an `init` entry. The reordering is not written back to the
    /// task file here.
    ///
    /// No `init` entry is added when the sorted list already equals the
    /// newest history entry, so reopening an unchanged file leaves history
    /// and redo alone. While redo is pending after an undo, a file that
    /// still holds exactly the newest entry is resumed in its saved order so
    /// the next undo steps further back instead of re-sorting.
    pub fn new(store: TaskStore, mut history: HistoryLog) -> Self {
        let mut tasks = store.load_tasks();
        renumber(&mut tasks);
        let latest = history.latest().map(|action| action.tasks.materialize());

        let resume_saved_order = history.can_redo() && latest.as_ref() == Some(&tasks);
        if !resume_saved_order {
            sort_incomplete_first(&mut tasks);
        }

        let in_sync = match latest {
            Some(latest) => latest == tasks,
            // An emptied log stands for the empty list while redo is pending
            None => tasks.is_empty() && history.can_redo(),
        };
        if !in_sync {
            history.record(ActionType::Init, &tasks);
        }
        debug!(tasks = tasks.len(), path = %store.path().display(), "task list opened");

        let mut app = Self {
            tasks,
            store,
            history,
            warning: None,
        };
        app.collect_history_warning();
        app
    }

    /// Open the task file and history under `data_dir` as configured.
    pub fn open(data_dir: &std::path::Path, config: &Config) -> Self {
        let store = TaskStore::open(config.tasks_path(data_dir));
        let history = HistoryLog::open(config.history_path(data_dir), config.history.max_entries);
        Self::new(store, history)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Most recent persistence failure, if any, clearing it.
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    /// Append a new incomplete task. Returns `None` for a blank title.
    pub fn add_task(&mut self, title: &str) -> Option<Task> {
        let title = normalize_title(title)?;
        let id = self.tasks.iter().map(|task| task.id + 1).max().unwrap_or(0);
        let task = Task::new(id, title);

        self.tasks.push(task);
        renumber(&mut self.tasks);
        self.commit(ActionType::Add);

        self.tasks.last().cloned()
    }

    /// Remove the task at `index`.
    pub fn delete_task(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() {
            return false;
        }

        let removed = self.tasks.remove(index);
        debug!(index, title = %removed.title, "deleted task");
        renumber(&mut self.tasks);
        self.commit(ActionType::Delete);
        true
    }

    /// Flip completion of the task at `index`.
    pub fn toggle_task(&mut self, index: usize) -> bool {
        let Some(task) = self.tasks.get_mut(index) else {
            return false;
        };

        task.completed = !task.completed;
        self.commit(ActionType::Toggle);
        true
    }

    /// Replace the title of the task at `index`. Blank titles are ignored.
    pub fn edit_task(&mut self, index: usize, new_title: &str) -> bool {
        if index >= self.tasks.len() {
            return false;
        }
        let Some(title) = normalize_title(new_title) else {
            return false;
        };

        self.tasks[index].title = title;
        self.commit(ActionType::Edit);
        true
    }

    /// Swap the task at `index` with the one above it.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.tasks.len() {
            return false;
        }

        self.tasks.swap(index, index - 1);
        renumber(&mut self.tasks);
        self.commit(ActionType::MoveUp);
        true
    }

    /// Swap the task at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() || index + 1 == self.tasks.len() {
            return false;
        }

        self.tasks.swap(index, index + 1);
        renumber(&mut self.tasks);
        self.commit(ActionType::MoveDown);
        true
    }

    /// Put incomplete tasks ahead of completed ones and save. Returns
    /// `false` without recording anything when the order is already right.
    pub fn sort_tasks(&mut self) -> bool {
        let mut sorted = self.tasks.clone();
        sort_incomplete_first(&mut sorted);
        if sorted == self.tasks {
            return false;
        }

        self.tasks = sorted;
        self.commit(ActionType::Sort);
        true
    }

    /// Restore the list as it was before the latest change. Returns `false`
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo();
        self.collect_history_warning();
        match restored {
            Some(tasks) => {
                self.replace_tasks(tasks);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone change. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo();
        self.collect_history_warning();
        match restored {
            Some(tasks) => {
                self.replace_tasks(tasks);
                true
            }
            None => false,
        }
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        renumber(&mut self.tasks);
        self.save();
    }

    fn commit(&mut self, action_type: ActionType) {
        self.save();
        self.history.record(action_type, &self.tasks);
        self.collect_history_warning();
    }

    fn save(&mut self) {
        if let Err(err) = self.store.save_tasks(&self.tasks) {
            warn!(path = %self.store.path().display(), error = %err, "failed to save tasks");
            self.warning = Some(format!("tasks not saved: {err}"));
        }
    }

    fn collect_history_warning(&mut self) {
        if let Some(warning) = self.history.take_warning() {
            self.warning = Some(warning);
        }
    }
}

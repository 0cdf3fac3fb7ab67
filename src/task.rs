//! Task values and list normalization.
//!
//! Task ids are positional: they are reassigned `0..n-1` in display order
//! after every structural change and must not be held across a mutation.

use serde::{Deserialize, Serialize};

/// A single checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: usize,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: usize, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Checkbox marker as written in the task file.
    pub fn checkbox(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// Reassign ids by position.
pub fn renumber(tasks: &mut [Task]) {
    for (idx, task) in tasks.iter_mut().enumerate() {
        task.id = idx;
    }
}

/// Move incomplete tasks ahead of completed ones, keeping the relative order
/// inside each group, then renumber.
pub fn sort_incomplete_first(tasks: &mut [Task]) {
    // sort_by_key is stable
    tasks.sort_by_key(|task| task.completed);
    renumber(tasks);
}

/// Normalize a user-supplied title for storage.
///
/// Returns `None` for blank input. Line breaks are folded into spaces since
/// the task file holds exactly one task per line.
pub fn normalize_title(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let title: String = raw
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .collect();
    Some(title.trim().to_string())
}

/// True when ids are exactly `0..n-1` in list order.
pub fn ids_are_sequential(tasks: &[Task]) -> bool {
    tasks.iter().enumerate().all(|(idx, task)| task.id == idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: usize, title: &str, completed: bool) -> Task {
        Task::new(id, title).with_completed(completed)
    }

    #[test]
    fn renumber_assigns_positions() {
        let mut tasks = vec![task(7, "a", false), task(2, "b", true), task(9, "c", false)];
        renumber(&mut tasks);
        assert!(ids_are_sequential(&tasks));
        assert_eq!(tasks[2].title, "c");
    }

    #[test]
    fn sort_is_a_stable_partition() {
        let mut tasks = vec![
            task(0, "done-1", true),
            task(1, "open-1", false),
            task(2, "done-2", true),
            task(3, "open-2", false),
        ];
        sort_incomplete_first(&mut tasks);

        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["open-1", "open-2", "done-1", "done-2"]);
        assert!(ids_are_sequential(&tasks));
    }

    #[test]
    fn normalize_title_rejects_blank() {
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   \t"), None);
        assert_eq!(normalize_title("  buy milk "), Some("buy milk".to_string()));
    }

    #[test]
    fn normalize_title_folds_line_breaks() {
        assert_eq!(
            normalize_title("line one\nline two\r\n"),
            Some("line one line two".to_string())
        );
    }

    #[test]
    fn checkbox_reflects_completion() {
        assert_eq!(task(0, "x", true).checkbox(), "[x]");
        assert_eq!(task(0, "x", false).checkbox(), "[ ]");
    }
}

//! Task file storage
//!
//! Owns the path of the checklist file and wraps the codec with file
//! existence handling. The file is created on demand with a short header so a
//! fresh data directory is immediately human-editable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::atomic;
use crate::codec;
use crate::error::Result;
use crate::task::Task;

/// Header written to a freshly created task file
pub const DEFAULT_HEADER: &str = "# Tasks";

/// Storage manager for the task checklist
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store and make sure its file exists. Creation failures are
    /// logged; a later save will retry the write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self::new(path);
        if let Err(err) = store.ensure_file_exists() {
            warn!(path = %store.path.display(), error = %err, "failed to create task file");
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and, when missing, a file holding the
    /// default header followed by a blank line.
    pub fn ensure_file_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !self.path.exists() {
            atomic::write_atomic_str(&self.path, &format!("{DEFAULT_HEADER}\n\n"))?;
            debug!(path = %self.path.display(), "created task file");
        }

        Ok(())
    }

    /// Load tasks from disk. A missing or unreadable file yields an empty
    /// list.
    pub fn load_tasks(&self) -> Vec<Task> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let tasks = codec::decode(&bytes);
                debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read task file");
                Vec::new()
            }
        }
    }

    /// Overwrite the task file with the given list.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        atomic::write_atomic_str(&self.path, &codec::encode(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_file_with_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/tasks.md");

        let store = TaskStore::open(&path);
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Tasks\n\n");
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn open_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.md");
        fs::write(&path, "- [x] keep me\n").unwrap();

        let store = TaskStore::open(&path);
        let tasks = store.load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "keep me");
        assert!(tasks[0].completed);
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::open(temp.path().join("tasks.md"));

        let tasks = vec![Task::new(0, "one"), Task::new(1, "two").with_completed(true)];
        store.save_tasks(&tasks).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "- [ ] one\n- [x] two\n"
        );
        assert_eq!(store.load_tasks(), tasks);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path().join("absent.md"));
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn load_directory_path_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = TaskStore::new(temp.path());
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn save_reports_unwritable_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let store = TaskStore::new(blocker.join("tasks.md"));
        assert!(store.save_tasks(&[Task::new(0, "x")]).is_err());
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use todo::app::TodoApp;
use todo::config::Config;

/// Throwaway data directory with the default file layout
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_path(&self) -> PathBuf {
        Config::default().tasks_path(self.path())
    }

    pub fn history_path(&self) -> PathBuf {
        Config::default().history_path(self.path())
    }

    pub fn write_tasks(&self, contents: &str) {
        fs::write(self.tasks_path(), contents).expect("write tasks");
    }

    pub fn read_tasks(&self) -> String {
        fs::read_to_string(self.tasks_path()).expect("read tasks")
    }

    pub fn read_history(&self) -> String {
        fs::read_to_string(self.history_path()).expect("read history")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.path().join("config.toml"), contents).expect("write config");
    }

    /// Open the controller the way the CLI does
    pub fn open(&self) -> TodoApp {
        let config = Config::load_from_dir(self.path());
        TodoApp::open(self.path(), &config)
    }
}

pub fn titles(app: &TodoApp) -> Vec<String> {
    app.tasks().iter().map(|task| task.title.clone()).collect()
}

pub fn ids(app: &TodoApp) -> Vec<usize> {
    app.tasks().iter().map(|task| task.id).collect()
}

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::app::TodoApp;
use crate::config::Config;
use crate::error::Result;

use super::prompt::{Prompt, PromptAction, PromptKind};
use super::view;

const EVENT_POLL_MS: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// Modal state layered over the task list
#[derive(Debug, Clone)]
pub(crate) enum Mode {
    Normal,
    Prompt(Prompt),
    ConfirmDelete(usize),
}

/// Everything the screen shows besides the tasks themselves
#[derive(Debug)]
pub struct ViewState {
    pub(crate) selected: usize,
    pub(crate) offset: usize,
    pub(crate) mode: Mode,
    pub(crate) status: Option<(String, StatusKind)>,
    pub(crate) show_help: bool,
    confirm_delete: bool,
    list_height: usize,
}

impl ViewState {
    pub fn new(config: &Config) -> Self {
        Self {
            selected: 0,
            offset: 0,
            mode: Mode::Normal,
            status: None,
            show_help: config.ui.show_help,
            confirm_delete: config.ui.confirm_delete,
            list_height: 0,
        }
    }

    /// Keep the selection on an existing row.
    pub(crate) fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Scroll just enough for the selected row to be visible.
    pub(crate) fn update_viewport(&mut self, list_height: usize) {
        self.list_height = list_height;
        if list_height == 0 {
            self.offset = self.selected;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + list_height {
            self.offset = self.selected + 1 - list_height;
        }
    }

    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn page(&self) -> isize {
        (self.list_height / 2).max(1) as isize
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Error));
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Info));
    }
}

pub fn run(mut todo: TodoApp, config: &Config) -> Result<()> {
    let mut state = ViewState::new(config);
    if let Some(warning) = todo.take_warning() {
        state.set_error(warning);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err.into());
        }
    };

    let result = run_loop(&mut terminal, &mut todo, &mut state);

    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    todo: &mut TodoApp,
    state: &mut ViewState,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, todo, state))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(todo, state, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    debug!(tasks = todo.len(), "leaving task list");
    Ok(())
}

/// Apply one key press. Returns true when the user asked to quit.
pub(crate) fn handle_key(todo: &mut TodoApp, state: &mut ViewState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if matches!(state.mode, Mode::Normal) {
            return true;
        }
        state.mode = Mode::Normal;
        return false;
    }

    match std::mem::replace(&mut state.mode, Mode::Normal) {
        Mode::Prompt(mut prompt) => {
            match prompt.handle_key(key) {
                PromptAction::None => state.mode = Mode::Prompt(prompt),
                PromptAction::Cancel => state.status = None,
                PromptAction::Submit => submit_prompt(todo, state, &prompt),
            }
            false
        }
        Mode::ConfirmDelete(index) => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => delete_selected(todo, state, index),
                _ => state.set_info("delete cancelled"),
            }
            false
        }
        Mode::Normal => handle_list_key(todo, state, key),
    }
}

fn handle_list_key(todo: &mut TodoApp, state: &mut ViewState, key: KeyEvent) -> bool {
    let len = todo.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.move_selection(state.page(), len);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.move_selection(-state.page(), len);
        }
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1, len),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1, len),
        KeyCode::Home | KeyCode::Char('g') => state.selected = 0,
        KeyCode::End | KeyCode::Char('G') => state.selected = len.saturating_sub(1),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if todo.toggle_task(state.selected) {
                state.status = None;
            }
        }
        KeyCode::Char('a') => state.mode = Mode::Prompt(Prompt::add()),
        KeyCode::Char('e') => match todo.task(state.selected) {
            Some(task) => state.mode = Mode::Prompt(Prompt::edit(state.selected, &task.title)),
            None => state.set_error("no task selected"),
        },
        KeyCode::Char('d') | KeyCode::Delete => {
            if state.selected >= len {
                state.set_error("no task selected");
            } else if state.confirm_delete {
                state.mode = Mode::ConfirmDelete(state.selected);
            } else {
                let index = state.selected;
                delete_selected(todo, state, index);
            }
        }
        KeyCode::Char('K') => {
            if todo.move_up(state.selected) {
                state.selected -= 1;
            }
        }
        KeyCode::Char('J') => {
            if todo.move_down(state.selected) {
                state.selected += 1;
            }
        }
        KeyCode::Char('s') => {
            if todo.sort_tasks() {
                state.set_info("sorted: incomplete first");
            } else {
                state.set_info("already sorted");
            }
        }
        KeyCode::Char('u') => {
            if todo.undo() {
                state.set_info("undone");
            } else {
                state.set_info("nothing to undo");
            }
        }
        KeyCode::Char('r') => {
            if todo.redo() {
                state.set_info("redone");
            } else {
                state.set_info("nothing to redo");
            }
        }
        KeyCode::Char('?') => state.show_help = !state.show_help,
        _ => {}
    }
    after_change(todo, state);
    false
}

fn submit_prompt(todo: &mut TodoApp, state: &mut ViewState, prompt: &Prompt) {
    match prompt.kind() {
        PromptKind::Add => match todo.add_task(prompt.input()) {
            Some(task) => {
                state.selected = task.id;
                state.status = None;
            }
            None => state.set_info("empty title, nothing added"),
        },
        PromptKind::Edit(index) => {
            if !todo.edit_task(index, prompt.input()) {
                state.set_info("empty title, task unchanged");
            } else {
                state.status = None;
            }
        }
    }
    after_change(todo, state);
}

fn delete_selected(todo: &mut TodoApp, state: &mut ViewState, index: usize) {
    if todo.delete_task(index) {
        state.set_info("deleted");
    }
    after_change(todo, state);
}

fn after_change(todo: &mut TodoApp, state: &mut ViewState) {
    state.clamp_selection(todo.len());
    if let Some(warning) = todo.take_warning() {
        state.set_error(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryLog;
    use crate::store::TaskStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn type_text(todo: &mut TodoApp, state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(!handle_key(todo, state, ch(c)));
        }
    }

    fn setup(config: &Config) -> (tempfile::TempDir, TodoApp, ViewState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::open(dir.path().join("tasks.md"));
        let todo = TodoApp::new(store, HistoryLog::in_memory(100));
        (dir, todo, ViewState::new(config))
    }

    fn titles(todo: &TodoApp) -> Vec<&str> {
        todo.tasks().iter().map(|task| task.title.as_str()).collect()
    }

    fn add(todo: &mut TodoApp, state: &mut ViewState, title: &str) {
        handle_key(todo, state, ch('a'));
        type_text(todo, state, title);
        handle_key(todo, state, key(KeyCode::Enter));
    }

    #[test]
    fn add_selects_new_task() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        add(&mut todo, &mut state, "buy milk");
        add(&mut todo, &mut state, "walk dog");

        assert_eq!(titles(&todo), ["buy milk", "walk dog"]);
        assert_eq!(state.selected, 1);
        assert!(matches!(state.mode, Mode::Normal));
    }

    #[test]
    fn quit_keys() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        assert!(handle_key(&mut todo, &mut state, ch('q')));
        assert!(handle_key(&mut todo, &mut state, key(KeyCode::Esc)));
        assert!(handle_key(
            &mut todo,
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn escape_in_prompt_does_not_quit() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        handle_key(&mut todo, &mut state, ch('a'));
        type_text(&mut todo, &mut state, "q");
        assert!(!handle_key(&mut todo, &mut state, key(KeyCode::Esc)));
        assert!(todo.is_empty());
        assert!(matches!(state.mode, Mode::Normal));
    }

    #[test]
    fn toggle_delete_and_undo() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        add(&mut todo, &mut state, "buy milk");
        add(&mut todo, &mut state, "walk dog");

        handle_key(&mut todo, &mut state, ch('k'));
        handle_key(&mut todo, &mut state, ch(' '));
        assert!(todo.tasks()[0].completed);

        handle_key(&mut todo, &mut state, ch('j'));
        handle_key(&mut todo, &mut state, ch('d'));
        assert_eq!(titles(&todo), ["buy milk"]);
        assert_eq!(state.selected, 0);

        handle_key(&mut todo, &mut state, ch('u'));
        assert_eq!(titles(&todo), ["buy milk", "walk dog"]);
        handle_key(&mut todo, &mut state, ch('r'));
        assert_eq!(titles(&todo), ["buy milk"]);
    }

    #[test]
    fn selection_follows_moved_task() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        add(&mut todo, &mut state, "a");
        add(&mut todo, &mut state, "b");
        add(&mut todo, &mut state, "c");

        handle_key(&mut todo, &mut state, ch('K'));
        assert_eq!(titles(&todo), ["a", "c", "b"]);
        assert_eq!(state.selected, 1);

        handle_key(&mut todo, &mut state, ch('K'));
        handle_key(&mut todo, &mut state, ch('K'));
        assert_eq!(titles(&todo), ["c", "a", "b"]);
        assert_eq!(state.selected, 0);

        handle_key(&mut todo, &mut state, ch('J'));
        assert_eq!(titles(&todo), ["a", "c", "b"]);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn edit_prompt_replaces_title() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        add(&mut todo, &mut state, "buy milk");

        handle_key(&mut todo, &mut state, ch('e'));
        handle_key(
            &mut todo,
            &mut state,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        type_text(&mut todo, &mut state, "buy oat milk");
        handle_key(&mut todo, &mut state, key(KeyCode::Enter));

        assert_eq!(titles(&todo), ["buy oat milk"]);
    }

    #[test]
    fn confirm_delete_requires_yes() {
        let mut config = Config::default();
        config.ui.confirm_delete = true;
        let (_dir, mut todo, mut state) = setup(&config);
        add(&mut todo, &mut state, "buy milk");

        handle_key(&mut todo, &mut state, ch('d'));
        assert!(matches!(state.mode, Mode::ConfirmDelete(0)));
        handle_key(&mut todo, &mut state, ch('n'));
        assert_eq!(todo.len(), 1);

        handle_key(&mut todo, &mut state, ch('d'));
        handle_key(&mut todo, &mut state, ch('y'));
        assert!(todo.is_empty());
    }

    #[test]
    fn undo_on_fresh_list_reports_status() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        handle_key(&mut todo, &mut state, ch('u'));
        handle_key(&mut todo, &mut state, ch('u'));
        let (message, kind) = state.status.clone().expect("status");
        assert_eq!(message, "nothing to undo");
        assert_eq!(kind, StatusKind::Info);
    }

    #[test]
    fn sort_key_reports_when_nothing_moved() {
        let (_dir, mut todo, mut state) = setup(&Config::default());
        add(&mut todo, &mut state, "buy milk");
        add(&mut todo, &mut state, "walk dog");
        let depth = todo.history().entries().len();

        handle_key(&mut todo, &mut state, ch('s'));
        assert_eq!(state.status.clone().expect("status").0, "already sorted");
        assert_eq!(todo.history().entries().len(), depth);

        handle_key(&mut todo, &mut state, ch('k'));
        handle_key(&mut todo, &mut state, ch(' '));
        handle_key(&mut todo, &mut state, ch('s'));
        assert_eq!(titles(&todo), ["walk dog", "buy milk"]);
        assert_eq!(todo.history().entries().len(), depth + 2);
    }

    #[test]
    fn viewport_scrolls_to_selection() {
        let mut state = ViewState::new(&Config::default());
        state.selected = 12;
        state.update_viewport(5);
        assert_eq!(state.offset, 8);

        state.selected = 3;
        state.update_viewport(5);
        assert_eq!(state.offset, 3);
    }
}

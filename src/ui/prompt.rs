use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Add,
    Edit(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    None,
    Cancel,
    Submit,
}

/// Single-line title input shown at the bottom of the screen
#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    pub fn add() -> Self {
        Self {
            kind: PromptKind::Add,
            input: String::new(),
        }
    }

    /// Edit prompt prefilled with the current title
    pub fn edit(index: usize, title: &str) -> Self {
        Self {
            kind: PromptKind::Edit(index),
            input: title.to_string(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Add => "New task: ",
            PromptKind::Edit(_) => "Edit task: ",
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        match key.code {
            KeyCode::Enter => PromptAction::Submit,
            KeyCode::Esc => PromptAction::Cancel,
            KeyCode::Backspace => {
                self.input.pop();
                PromptAction::None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                PromptAction::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                PromptAction::Cancel
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                    self.input.push(ch);
                }
                PromptAction::None
            }
            _ => PromptAction::None,
        }
    }
}

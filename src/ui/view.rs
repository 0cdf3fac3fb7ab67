use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::TodoApp;
use crate::task::Task;

use super::app::{Mode, StatusKind, ViewState};
use super::prompt::Prompt;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);

const HELP_TEXT: &str = "j/k move  space toggle  a add  e edit  d delete  J/K reorder  s sort  u undo  r redo  q quit";

pub fn render(frame: &mut Frame, todo: &TodoApp, state: &mut ViewState) {
    let area = frame.size();
    let footer_height = if state.show_help { 3 } else { 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(footer_height)].as_ref())
        .split(area);

    render_list(frame, todo, state, chunks[0]);
    render_footer(frame, todo, state, chunks[1]);

    if let Mode::ConfirmDelete(index) = &state.mode {
        if let Some(task) = todo.task(*index) {
            render_delete_confirm_modal(frame, area, task);
        }
    }
}

fn render_list(frame: &mut Frame, todo: &TodoApp, state: &mut ViewState, area: Rect) {
    let done = todo.tasks().iter().filter(|task| task.completed).count();
    let title = format!(" Tasks ({done}/{}) ", todo.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER_LIST))
        .title(Span::styled(
            title,
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ));

    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    state.clamp_selection(todo.len());
    state.update_viewport(height);

    let lines: Vec<Line<'static>> = if todo.is_empty() {
        vec![Line::from(Span::styled(
            "No tasks. Press a to add one.",
            Style::default().fg(COLOR_MUTED),
        ))]
    } else {
        todo.tasks()
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(height)
            .map(|(idx, task)| render_row(task, idx == state.selected, width))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let checkbox = task.checkbox();
    let prefix_width = marker.len() + checkbox.len() + 1;
    let title = truncate_text(&task.title, width.saturating_sub(prefix_width));

    let checkbox_style = if task.completed {
        Style::default().fg(COLOR_SUCCESS)
    } else {
        Style::default().fg(COLOR_MUTED)
    };
    let title_style = if task.completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(COLOR_ACCENT)),
        Span::styled(checkbox, checkbox_style),
        Span::raw(" "),
        Span::styled(title, title_style),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.bg(COLOR_BG_MUTED).add_modifier(Modifier::BOLD);
        }
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, todo: &TodoApp, state: &ViewState, area: Rect) {
    let mut lines = Vec::new();

    if let Mode::Prompt(prompt) = &state.mode {
        lines.push(prompt_line(prompt));
        let x = area.x + (prompt.label().len() + prompt.input().chars().count()) as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(1)), area.y);
    } else if let Some((message, kind)) = &state.status {
        let style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        lines.push(Line::from(Span::styled(message.clone(), style)));
    } else {
        lines.push(Line::from(""));
    }

    let history = todo.history();
    lines.push(Line::from(Span::styled(
        format!(
            "undo {}  redo {}",
            history.entries().len(),
            history.undone_entries().len()
        ),
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    if state.show_help {
        lines.push(Line::from(Span::styled(
            HELP_TEXT,
            Style::default().fg(COLOR_INFO),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn prompt_line(prompt: &Prompt) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            prompt.label(),
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(prompt.input().to_string(), Style::default().fg(COLOR_TEXT)),
    ])
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, task: &Task) {
    let content_width = area.width.saturating_sub(8).min(56);
    let modal = centered_rect(content_width, 7, area);
    frame.render_widget(Clear, modal);

    let title_width = (content_width as usize).saturating_sub(4);
    let lines = vec![
        Line::from(Span::styled(
            "Delete task?",
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            truncate_text(&task.title, title_width),
            Style::default().fg(COLOR_TEXT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  any other key cancels",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Delete"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut out: String = value.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

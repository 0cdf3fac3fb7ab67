//! Shared output formatting for todo CLI commands.

use serde::Serialize;

use crate::error::{JsonError, Result};
use crate::task::Task;

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if let Some(human) = human {
        // Warnings still reach stderr in quiet mode
        if options.quiet {
            for warning in &human.warnings {
                eprintln!("warning: {warning}");
            }
            return Ok(());
        }
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: JsonError,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: JsonError::from(err),
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = error_hint(err) {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_lines(&mut lines, &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);

    lines.join("\n")
}

/// Render a task as it appears in `todo list`
pub fn format_task(task: &Task) -> String {
    format!("{:>3}  {} {}", task.id, task.checkbox(), task.title)
}

pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--data-dir" {
            // Skip the flag's value
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "todo".to_string()
}

fn error_hint(err: &crate::error::Error) -> Option<String> {
    use crate::error::Error;

    match err {
        Error::IndexOutOfRange { .. } => Some("todo list".to_string()),
        Error::NothingToRedo => Some("redo is only available right after undo".to_string()),
        Error::InvalidConfig(_) => Some("fix config.toml then retry".to_string()),
        _ => None,
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_lines(lines: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.extend(items.iter().cloned());
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_human_includes_sections() {
        let mut output = HumanOutput::new("Added task 0");
        output.push_summary("title", "buy milk");
        output.push_detail("  0  [ ] buy milk");
        output.push_warning("tasks not saved: disk full");

        let text = format_human(&output);
        assert!(text.starts_with("Added task 0"));
        assert!(text.contains("- title: buy milk"));
        assert!(text.contains("  0  [ ] buy milk"));
        assert!(text.contains("Warnings:\n- tasks not saved: disk full"));
    }

    #[test]
    fn format_human_header_only() {
        let output = HumanOutput::new("No tasks");
        assert_eq!(format_human(&output), "No tasks");
    }

    #[test]
    fn format_task_aligns_id() {
        let task = Task::new(3, "walk dog").with_completed(true);
        assert_eq!(format_task(&task), "  3  [x] walk dog");
    }
}

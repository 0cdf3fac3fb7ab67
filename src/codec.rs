//! Plain-text checklist codec.
//!
//! One task per line:
//!
//! ```text
//! - [ ] incomplete title
//! - [x] completed title
//! ```
//!
//! Decoding is lenient: the first `- [x] ` or `- [ ] ` marker on a line is
//! used wherever it appears, anything else (headings, blank lines, prose) is
//! skipped, and invalid UTF-8 is replaced rather than rejected.

use crate::task::Task;

const MARKER_PREFIX: &str = "- [";
const MARKER_LEN: usize = 6; // "- [x] "

/// Encode tasks as checklist lines, each terminated by a newline.
pub fn encode(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&encode_line(task));
        out.push('\n');
    }
    out
}

/// Encode a single task without the trailing newline.
fn encode_line(task: &Task) -> String {
    format!("- {} {}", task.checkbox(), task.title)
}

/// Decode raw file contents. Ids are assigned by position among the
/// recognised lines.
pub fn decode(bytes: &[u8]) -> Vec<Task> {
    let content = String::from_utf8_lossy(bytes);
    decode_str(&content)
}

/// Decode already-valid text.
pub fn decode_str(content: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((completed, title)) = parse_line(line) {
            tasks.push(Task::new(tasks.len(), title).with_completed(completed));
        }
    }
    tasks
}

/// Parse one line into `(completed, title)`.
pub fn parse_line(line: &str) -> Option<(bool, &str)> {
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(MARKER_PREFIX) {
        let start = search_from + offset;
        if let Some(parsed) = parse_marker_at(line, start) {
            return Some(parsed);
        }
        search_from = start + MARKER_PREFIX.len();
    }
    None
}

fn parse_marker_at(line: &str, start: usize) -> Option<(bool, &str)> {
    let bytes = line.as_bytes();
    let marker = *bytes.get(start + 3)?;
    if bytes.get(start + 4) != Some(&b']') || bytes.get(start + 5) != Some(&b' ') {
        return None;
    }
    let completed = match marker {
        b'x' => true,
        b' ' => false,
        _ => return None,
    };
    // Marker bytes are ASCII, so start + MARKER_LEN is a char boundary
    let title = &line[start + MARKER_LEN..];
    if title.is_empty() {
        return None;
    }
    Some((completed, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_checkbox_lines() {
        let tasks = vec![
            Task::new(0, "buy milk"),
            Task::new(1, "walk dog").with_completed(true),
        ];
        assert_eq!(encode(&tasks), "- [ ] buy milk\n- [x] walk dog\n");
    }

    #[test]
    fn encode_empty_list_is_empty() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_skips_headers_and_blank_lines() {
        let content = "# Tasks\n\n- [ ] first\nnot a task\n- [x] second\n   \n";
        let tasks = decode_str(content);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], Task::new(0, "first"));
        assert_eq!(tasks[1], Task::new(1, "second").with_completed(true));
    }

    #[test]
    fn decode_finds_marker_anywhere_on_line() {
        let tasks = decode_str("  - [x] indented\nnote - [ ] trailing\n");
        assert_eq!(tasks[0].title, "indented");
        assert!(tasks[0].completed);
        assert_eq!(tasks[1].title, "trailing");
        assert!(!tasks[1].completed);
    }

    #[test]
    fn decode_uses_first_valid_marker() {
        let tasks = decode_str("- [?] no - [ ] yes - [x] nested\n");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "yes - [x] nested");
        assert!(!tasks[0].completed);
    }

    #[test]
    fn decode_rejects_empty_titles_and_uppercase_marker() {
        let tasks = decode_str("- [ ] \n- [X] upper\n- [x]nospace\n");
        assert!(tasks.is_empty());
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        let mut bytes = b"- [ ] caf".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"\n- [x] ok\n");

        let tasks = decode(&bytes);
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].title.starts_with("caf"));
        assert!(tasks[0].title.contains('\u{FFFD}'));
        assert_eq!(tasks[1].title, "ok");
    }

    #[test]
    fn decode_handles_crlf() {
        let tasks = decode_str("- [ ] windows\r\n- [x] line\r\n");
        assert_eq!(tasks[0].title, "windows");
        assert_eq!(tasks[1].title, "line");
    }

    #[test]
    fn round_trip_preserves_titles_and_flags() {
        let tasks = vec![
            Task::new(0, "alpha"),
            Task::new(1, "beta [with] brackets").with_completed(true),
            Task::new(2, "할일 unicode"),
        ];
        let decoded = decode_str(&encode(&tasks));
        assert_eq!(decoded, tasks);
    }
}

//! `-F` format strings and parsers for tmux list output.
//!
//! Each record is one line of tab-separated fields. Free-text fields
//! (window name, pane title, session path) are always last so that embedded
//! tabs stay inside them.

use chrono::{DateTime, Utc};

use crate::{
    types::{PaneId, PaneInfo, SessionSummary, WindowInfo},
    Error, Result,
};

pub const SESSION_FORMAT: &str =
    "#{session_name}\t#{session_windows}\t#{session_attached}\t#{session_created}\t#{session_path}";

pub const WINDOW_FORMAT: &str =
    "#{window_index}\t#{window_id}\t#{window_zoomed_flag}\t#{window_panes}\t#{window_name}";

pub const PANE_FORMAT: &str = "#{pane_id}\t#{pane_index}\t#{window_index}\t#{pane_width}\t#{pane_height}\t#{pane_current_command}\t#{pane_title}";

fn fields<'a, const N: usize>(line: &'a str, record: &str) -> Result<[&'a str; N]> {
    let parts: Vec<&'a str> = line.splitn(N, '\t').collect();
    parts
        .try_into()
        .map_err(|parts: Vec<&'a str>| {
            Error::parse_error(format!(
                "{record} record has {} fields, expected {N}: {line:?}",
                parts.len()
            ))
        })
}

fn number(value: &str, field: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::parse_error(format!("invalid {field} '{value}'")))
}

fn records(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter(|line| !line.trim().is_empty())
}

/// Parse `list-sessions -F SESSION_FORMAT` output.
pub fn parse_sessions(output: &str) -> Result<Vec<SessionSummary>> {
    records(output)
        .map(|line| {
            let [name, windows, attached, created, path] = fields::<5>(line, "session")?;
            Ok(SessionSummary {
                name: name.to_string(),
                windows: number(windows, "window count")?,
                attached: number(attached, "attached count")? > 0,
                created: created
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
                path: path.to_string(),
            })
        })
        .collect()
}

/// Parse `list-windows -F WINDOW_FORMAT` output.
pub fn parse_windows(output: &str) -> Result<Vec<WindowInfo>> {
    records(output)
        .map(|line| {
            let [index, id, zoomed, panes, name] = fields::<5>(line, "window")?;
            Ok(WindowInfo {
                index: number(index, "window index")?,
                id: id.to_string(),
                zoomed: zoomed.trim() == "1",
                panes: number(panes, "pane count")?,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Parse `list-panes -F PANE_FORMAT` output, preserving tmux order.
pub fn parse_panes(output: &str) -> Result<Vec<PaneInfo>> {
    records(output)
        .map(|line| {
            let [id, index, window_index, width, height, command, title] =
                fields::<7>(line, "pane")?;
            Ok(PaneInfo {
                id: PaneId::parse(id)?,
                index: number(index, "pane index")?,
                window_index: number(window_index, "window index")?,
                width: number(width, "pane width")?,
                height: number(height, "pane height")?,
                current_command: command.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

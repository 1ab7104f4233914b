//! Typed extraction of positional arguments.
//!
//! clap delivers raw strings; every value is validated here before any
//! configuration is loaded or tmux is contacted.

use clap::ArgMatches;
use panepool_core::{AgentCounts, Error, Result, SessionName};

fn raw<'a>(m: &'a ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id).map(String::as_str)
}

/// Required session name.
pub fn session(m: &ArgMatches, id: &str) -> Result<SessionName> {
    let value = raw(m, id).ok_or_else(|| Error::usage(format!("<{id}> is required")))?;
    SessionName::parse(value)
}

/// Parse a non-negative integer argument.
pub fn parse_count(label: &str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| {
        Error::usage(format!(
            "{label} must be a non-negative integer, got '{value}'"
        ))
    })
}

/// Parse a strictly positive integer argument.
pub fn parse_positive(label: &str, value: &str) -> Result<u32> {
    match parse_count(label, value) {
        Ok(0) => Err(Error::usage(format!("{label} must be at least 1, got '{value}'"))),
        Err(_) => Err(Error::usage(format!(
            "{label} must be a positive integer, got '{value}'"
        ))),
        ok => ok,
    }
}

/// Optional non-negative count with a default.
pub fn count(m: &ArgMatches, id: &str, default: u32) -> Result<u32> {
    raw(m, id).map_or(Ok(default), |v| parse_count(id, v))
}

/// Optional positive count; `None` when absent.
pub fn positive(m: &ArgMatches, id: &str) -> Result<Option<u32>> {
    raw(m, id).map(|v| parse_positive(id, v)).transpose()
}

/// `cc cod gmi` positional counts with per-command defaults. Fails with
/// `NothingToDo` when all three are zero.
pub fn agent_counts(m: &ArgMatches, defaults: AgentCounts) -> Result<AgentCounts> {
    let counts = AgentCounts::new(
        count(m, "cc", defaults.cc)?,
        count(m, "cod", defaults.cod)?,
        count(m, "gmi", defaults.gmi)?,
    );
    if counts.is_empty() {
        Err(Error::nothing_to_do())
    } else {
        Ok(counts)
    }
}

/// Trailing words joined by single spaces. Blank text is `EmptyCommand`.
pub fn command_text(m: &ArgMatches, id: &str) -> Result<String> {
    let text = m
        .get_many::<String>(id)
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(Error::empty_command())
    } else {
        Ok(text)
    }
}

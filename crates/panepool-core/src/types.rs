//! Session, window and pane entities as parsed from multiplexer records.
//!
//! Identifiers follow the parse-at-boundaries pattern: each newtype validates
//! its input once on construction and cannot represent invalid states.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A validated tmux session name.
///
/// Session names are trimmed, non-empty, at most [`SessionName::MAX_LENGTH`]
/// characters, and never contain `:` or `.` (tmux target separators).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionName(String);

impl SessionName {
    /// Maximum allowed length for a session name
    pub const MAX_LENGTH: usize = 63;

    /// Parse and validate a session name (trims whitespace first).
    ///
    /// # Errors
    ///
    /// Returns a usage error if the name is empty, too long, or contains
    /// `:`, `.` or control characters.
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(Error::usage("session name cannot be empty"));
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(Error::usage(format!(
                "session name '{trimmed}' exceeds {} characters",
                Self::MAX_LENGTH
            )));
        }

        if let Some(bad) = trimmed.chars().find(|c| matches!(c, ':' | '.')) {
            return Err(Error::usage(format!(
                "session name '{trimmed}' must not contain '{bad}'"
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(Error::usage(
                "session name must not contain control characters",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Target that matches this session exactly (no prefix matching).
    #[must_use]
    pub fn exact_target(&self) -> String {
        format!("={}", self.0)
    }
}

impl TryFrom<String> for SessionName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SessionName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for SessionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SessionName> for String {
    fn from(name: SessionName) -> Self {
        name.0
    }
}

/// Stable pane identifier (`%N`), unaffected by index renumbering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaneId(String);

impl PaneId {
    /// # Errors
    ///
    /// Returns a parse error unless the input is `%` followed by digits.
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let trimmed = s.trim();
        match trimmed.strip_prefix('%') {
            Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(Error::parse_error(format!("invalid pane id '{trimmed}'"))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PaneId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<PaneId> for String {
    fn from(id: PaneId) -> Self {
        id.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A window addressed by session and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowRef {
    pub session: SessionName,
    pub index: u32,
}

impl WindowRef {
    #[must_use]
    pub const fn new(session: SessionName, index: u32) -> Self {
        Self { session, index }
    }

    /// tmux target string `session:index`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}:{}", self.session, self.index)
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target())
    }
}

/// One row of `list-windows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub index: u32,
    pub id: String,
    pub zoomed: bool,
    pub panes: u32,
    pub name: String,
}

/// One row of `list-panes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneInfo {
    pub id: PaneId,
    pub index: u32,
    pub window_index: u32,
    pub width: u32,
    pub height: u32,
    pub current_command: String,
    pub title: String,
}

/// One row of `list-sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub windows: u32,
    pub attached: bool,
    pub created: Option<DateTime<Utc>>,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_name_trims() -> Result<()> {
        let name = SessionName::parse("  alpha  ")?;
        assert_eq!(name.as_str(), "alpha");
        Ok(())
    }

    #[test]
    fn test_session_name_rejects_colon_and_dot() {
        assert!(SessionName::parse("foo:bar").is_err());
        assert!(SessionName::parse("foo.bar").is_err());
    }

    #[test]
    fn test_session_name_rejects_empty() {
        assert!(SessionName::parse("").is_err());
        assert!(SessionName::parse("   ").is_err());
    }

    #[test]
    fn test_session_name_rejects_too_long() {
        let long = "x".repeat(SessionName::MAX_LENGTH + 1);
        assert!(SessionName::parse(long).is_err());
        let max = "x".repeat(SessionName::MAX_LENGTH);
        assert!(SessionName::parse(max).is_ok());
    }

    #[test]
    fn test_session_name_error_is_usage() {
        let Err(err) = SessionName::parse("foo:bar") else {
            panic!("expected rejection");
        };
        assert!(err.is_usage());
        assert!(err.to_string().contains("must not contain ':'"));
    }

    #[test]
    fn test_session_name_allows_dashes_and_underscores() {
        assert!(SessionName::parse("my-project_2").is_ok());
    }

    #[test]
    fn test_exact_target() -> Result<()> {
        assert_eq!(SessionName::parse("alpha")?.exact_target(), "=alpha");
        Ok(())
    }

    #[test]
    fn test_pane_id_parse() {
        assert!(PaneId::parse("%12").is_ok());
        assert!(PaneId::parse("12").is_err());
        assert!(PaneId::parse("%").is_err());
        assert!(PaneId::parse("%1a").is_err());
    }

    #[test]
    fn test_window_target() -> Result<()> {
        let window = WindowRef::new(SessionName::parse("alpha")?, 1);
        assert_eq!(window.target(), "alpha:1");
        Ok(())
    }
}

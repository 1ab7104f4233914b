use serde::{Deserialize, Serialize};

/// `OutputFormat` selects how command results are printed.
///
/// # Examples
///
/// ```
/// use panepool_core::OutputFormat;
///
/// assert!(OutputFormat::from_json_flag(true).is_json());
/// assert!(OutputFormat::from_json_flag(false).is_human());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format - structured, machine-readable
    Json,
    /// Human-readable output format - terminal-friendly
    #[default]
    Human,
}

impl OutputFormat {
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Convert a `--json` flag into a format.
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Human => write!(f, "human"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_human() {
        assert_eq!(OutputFormat::default(), OutputFormat::Human);
    }

    #[test]
    fn test_serde_lowercase() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&OutputFormat::Json)?, "\"json\"");
        let parsed: OutputFormat = serde_json::from_str("\"human\"")?;
        assert_eq!(parsed, OutputFormat::Human);
        Ok(())
    }
}

//! Validation error types for arguments and configuration.
//!
//! These errors are raised before any multiplexer state is touched.

use thiserror::Error;

/// Validation errors represent incorrect user input or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Missing or malformed arguments
    #[error("Usage error: {0}")]
    Usage(String),
    /// Every requested agent count was zero
    #[error("Nothing to do: all requested agent counts are zero")]
    NothingToDo,
    /// Route or broadcast text was empty
    #[error("Command text cannot be empty")]
    EmptyCommand,
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Parse error when reading configuration or multiplexer records
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ValidationError {
    /// Get exit code for validation errors (always 1).
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_display() {
        assert_eq!(
            ValidationError::EmptyCommand.to_string(),
            "Command text cannot be empty"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ValidationError::Parse("bad pane record".to_string());
        assert_eq!(err.to_string(), "Parse error: bad pane record");
    }
}

//! Execution error types for session and pane state.

use thiserror::Error;

/// Errors raised while operating on an existing (or expected) session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Session is not registered with the multiplexer
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    /// Pane index or id does not exist in the session
    #[error("Pane '{pane}' not found in session '{session}'")]
    PaneNotFound { session: String, pane: String },
    /// Window or pane set could not be resolved for an existing session
    #[error("Allocation error: {0}")]
    Allocation(String),
}

impl ExecutionError {
    /// Get exit code for execution errors (always 1).
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_not_found_display() {
        let err = ExecutionError::PaneNotFound {
            session: "alpha".to_string(),
            pane: "7".to_string(),
        };
        assert_eq!(err.to_string(), "Pane '7' not found in session 'alpha'");
    }
}

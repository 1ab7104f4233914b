//! System error types for IO and external commands.
//!
//! These errors represent failures in system operations that are typically
//! out of the user's direct control.

use thiserror::Error;

/// System errors represent failures in IO, external commands, or the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    /// Required binary is not installed
    #[error("{binary} is not installed or not in PATH.\n\n{guidance}")]
    DependencyMissing { binary: String, guidance: String },
    /// External command exited unsuccessfully
    #[error("{program} {operation} failed: {stderr}")]
    Command {
        program: String,
        operation: String,
        stderr: String,
    },
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(String),
    /// Confirmation required without a terminal to answer it
    #[error("Confirmation required but stdin is not a terminal: {0}\nRe-run with --force to skip the prompt.")]
    NonInteractive(String),
}

impl SystemError {
    /// Get exit code for system errors (always 1).
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

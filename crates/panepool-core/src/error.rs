//! Error types for Panepool with categorization:
//!
//! - **Validation errors**: malformed arguments, empty requests, bad configuration
//! - **Execution errors**: missing sessions or panes, unresolvable pane sets
//! - **System errors**: missing tmux, failed external commands, IO
//!
//! The command-line contract maps every category to exit code 1.

pub mod execution;
pub mod system;
pub mod validation;

use std::fmt;

pub use execution::ExecutionError;
pub use system::SystemError;
pub use validation::ValidationError;

/// Top-level error type that can represent any error in the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Validation error from input or configuration
    Validation(ValidationError),
    /// Execution error against session or pane state
    Execution(ExecutionError),
    /// System error from IO or external operations
    System(SystemError),
}

impl Error {
    /// Create a usage error for malformed or missing arguments.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::Usage(msg.into()))
    }

    /// Every requested agent count was zero.
    pub const fn nothing_to_do() -> Self {
        Self::Validation(ValidationError::NothingToDo)
    }

    /// A route or broadcast was given no command text.
    pub const fn empty_command() -> Self {
        Self::Validation(ValidationError::EmptyCommand)
    }

    /// Create a validation error from an invalid config.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidConfig(msg.into()))
    }

    /// Create a validation error from a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::Parse(msg.into()))
    }

    /// The named session is not registered with the multiplexer.
    pub fn session_not_found(session: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::SessionNotFound(session.into()))
    }

    /// The referenced pane does not exist in the session.
    pub fn pane_not_found(session: impl Into<String>, pane: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::PaneNotFound {
            session: session.into(),
            pane: pane.into(),
        })
    }

    /// The window or pane set of an existing session could not be resolved.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::Allocation(msg.into()))
    }

    /// A required external binary is unavailable.
    pub fn dependency_missing(binary: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self::System(SystemError::DependencyMissing {
            binary: binary.into(),
            guidance: guidance.into(),
        })
    }

    /// An external command exited unsuccessfully.
    pub fn command_error(
        program: impl Into<String>,
        operation: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::System(SystemError::Command {
            program: program.into(),
            operation: operation.into(),
            stderr: stderr.into(),
        })
    }

    /// Create a system error from an IO error.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::System(SystemError::Io(msg.into()))
    }

    /// A confirmation was needed but no terminal can answer it.
    pub fn non_interactive(prompt: impl Into<String>) -> Self {
        Self::System(SystemError::NonInteractive(prompt.into()))
    }

    /// True when the error is a usage-class failure (argument problems).
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::Usage(_) | ValidationError::NothingToDo)
        )
    }

    /// True when a session or pane lookup failed.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Execution(ExecutionError::SessionNotFound(_) | ExecutionError::PaneNotFound { .. })
        )
    }

    /// Returns the exit code for this error.
    ///
    /// Every failure exits with 1; success is 0.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(err) => err.exit_code(),
            Self::Execution(err) => err.exit_code(),
            Self::System(err) => err.exit_code(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Execution(err) => write!(f, "{err}"),
            Self::System(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::parse_error(format!("Failed to parse config: {err}"))
    }
}

/// Errors from the dispatch layer.
use std::fmt;

use thiserror::Error;

/// Where a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Typed at the menu prompt.
    Interactive,
    /// First positional command-line argument.
    Argument,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => f.write_str("menu choice"),
            Self::Argument => f.write_str("test suite"),
        }
    }
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The test tool cannot be invoked and installing it did not help.
    #[error("{tool} is not available: {reason}")]
    ToolUnavailable {
        /// Name of the missing tool.
        tool: String,
        /// What went wrong with the probe or the install.
        reason: String,
    },

    /// The selection matched neither a key/token nor the quit sentinel.
    #[error("Invalid {mode} '{input}'")]
    InvalidSelection {
        /// The raw input.
        input: String,
        /// Menu or command line.
        mode: SelectionMode,
        /// Closest accepted token, if any.
        suggestion: Option<&'static str>,
    },

    /// The dispatched test command did not exit with status zero.
    #[error("Test run '{token}' failed")]
    CommandFailed {
        /// Token of the option that ran.
        token: &'static str,
    },

    /// Reading the menu choice or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolUnavailable { .. }
            | Self::InvalidSelection { .. }
            | Self::CommandFailed { .. }
            | Self::Io(_) => 1,
        }
    }

    /// Machine-readable error code (snake_case) for the JSON envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ToolUnavailable { .. } => "tool_unavailable",
            Self::InvalidSelection { .. } => "invalid_selection",
            Self::CommandFailed { .. } => "command_failed",
            Self::Io(_) => "io_error",
        }
    }
}

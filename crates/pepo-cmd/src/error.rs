//! Error types for the command system
//!
//! This module defines the error taxonomy for registration, macro management
//! and line dispatch.

use std::path::PathBuf;

use pepo_settings::SettingError;
use thiserror::Error;

/// Result type for command operations
pub type CmdResult<T = ()> = Result<T, CmdError>;

/// Errors that can occur while registering, dispatching or running commands
#[derive(Debug, Error)]
pub enum CmdError {
    /// Two commands claim the same alias (fatal at startup)
    #[error("duplicate alias '{alias}': already registered by '{existing}'")]
    DuplicateAlias { alias: String, existing: String },

    /// A command definition is malformed
    #[error("invalid command registration: {0}")]
    InvalidRegistration(String),

    /// A macro name collides with a command alias
    #[error("reserved word, {0}")]
    ReservedName(String),

    /// Macro or file lookup missed
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid or missing path on import/export
    #[error("invalid path {path}: {reason}")]
    Path { path: PathBuf, reason: String },

    /// Write permission denied
    #[error("write permission to {0} denied")]
    Permission(PathBuf),

    /// A command rejected its arguments
    #[error("'{command}' takes {expected} argument(s), got {got} (usage: {usage})")]
    ArgumentMismatch {
        command: String,
        expected: String,
        got: usize,
        usage: String,
    },

    /// A single argument could not be interpreted
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Input matched neither a macro nor a command
    #[error("invalid command: {input}")]
    UnknownCommand {
        input: String,
        suggestions: Vec<String>,
    },

    /// The yes/no decision point of a destructive operation was not granted
    #[error("confirmation required to {0}")]
    ConfirmationRequired(String),

    /// A macro tried to invoke a macro that is already playing
    #[error("macro cycle detected: {}", .0.join(" -> "))]
    MacroCycle(Vec<String>),

    /// Macro nesting exceeded the configured ceiling
    #[error("maximum macro depth ({limit}) exceeded")]
    MacroDepth { limit: usize },

    /// Setting error
    #[error(transparent)]
    Setting(#[from] SettingError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmdError {
    /// Create an invalid argument error
    pub fn invalid_arg(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CmdError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a path error
    pub fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CmdError::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        CmdError::NotFound(what.into())
    }
}

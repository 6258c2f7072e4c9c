//! Pepo Command Engine
//!
//! This crate provides the command registry, macro store, suggestion matcher
//! and line dispatcher behind the `pepo` shell.
//!
//! # Overview
//!
//! A session feeds one line at a time into a [`Dispatcher`]:
//! - A line equal to a macro name plays that macro, line by line
//! - Anything else is parsed; the first token (lower-cased) selects a command
//! - Blank lines and `#` comments do nothing
//! - Unknown input is reported along with "did you mean" suggestions
//!
//! Macros can be recorded interactively, defined on one line
//! (`set-macro name a b; c d`), and moved in and out of `.pep` files.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pepo_cmd::{BufferedPrompt, CommandRegistry, Dispatcher, FeedbackKind, RecordingFeedback};
//!
//! let registry = Arc::new(CommandRegistry::with_builtins().unwrap());
//! let mut shell = Dispatcher::new(registry, BufferedPrompt::new(), RecordingFeedback::new());
//!
//! shell.dispatch("set-macro setup sound on; suggestions 5");
//! shell.dispatch("setup");
//! shell.dispatch("# just a note");
//!
//! assert_eq!(
//!     shell.feedback().signals(),
//!     &[FeedbackKind::Success, FeedbackKind::Success, FeedbackKind::Success, FeedbackKind::Neutral]
//! );
//! ```
//!
//! # Architecture
//!
//! - **CommandRegistry**: maps normalized aliases to command implementations
//! - **MacroStore**: named action-line lists, with `.pep` import/export
//! - **suggest**: anagram / edit-distance matching for unknown input
//! - **Dispatcher**: per-line resolution, macro playback and feedback
//! - **Prompt / Feedback**: capabilities the front-end implements

mod args;
mod capability;
mod command;
pub mod commands;
mod dispatcher;
mod error;
mod macro_store;
mod parser;
pub mod suggest;

// Re-export main types
pub use args::{Args, ParsedLine, PERMISSION_MARK};
pub use capability::{
    BufferedPrompt, Feedback, FeedbackKind, OutputKind, OutputMessage, Prompt, RecordingFeedback,
};
pub use command::{Arity, Command, CommandContext, CommandRegistry, FnCommand};
pub use dispatcher::{Dispatcher, LineOutcome, ShellState};
pub use error::{CmdError, CmdResult};
pub use macro_store::{ExportReport, ImportReport, MacroStore, MACRO_EXTENSION};
pub use parser::{first_token, is_comment, parse_line, split_definition};
pub use suggest::suggest;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::capability::{Feedback, FeedbackKind, OutputMessage, Prompt};
    pub use crate::command::{Arity, Command, CommandContext, CommandRegistry};
    pub use crate::dispatcher::{Dispatcher, LineOutcome};
    pub use crate::error::{CmdError, CmdResult};
    pub use crate::macro_store::MacroStore;
}

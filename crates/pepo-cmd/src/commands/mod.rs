//! Command implementations
//!
//! This module contains all built-in command implementations organized by category.

pub mod control;
pub mod macros;
pub mod settings;
pub mod system;

use crate::command::{CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};

/// Register all built-in commands with the registry
pub fn register_all(registry: &mut CommandRegistry) -> CmdResult {
    // Session control (quit, help, clear, refresh)
    control::register(registry)?;

    // Settings (suggestions, sound, set/get/unset, settings)
    settings::register(registry)?;

    // Macro recording, playback files and inspection
    macros::register(registry)?;

    // Filesystem and terminal helpers
    system::register(registry)?;

    Ok(())
}

/// Run an operation that may need the user's go-ahead
///
/// The operation is first tried with `granted`. If it answers
/// `ConfirmationRequired`, the user is asked and, on yes, it is retried with
/// permission. `Ok(None)` means the user declined.
pub(crate) fn with_confirmation<T, Op>(
    ctx: &mut CommandContext<'_>,
    granted: bool,
    mut op: Op,
) -> CmdResult<Option<T>>
where
    Op: FnMut(&mut CommandContext<'_>, bool) -> CmdResult<T>,
{
    match op(ctx, granted) {
        Err(CmdError::ConfirmationRequired(action)) => {
            if ctx.confirm(&format!("Are you sure you want to {}?", action)) {
                op(ctx, true).map(Some)
            } else {
                ctx.warn(format!("did not {}", action));
                Ok(None)
            }
        }
        other => other.map(Some),
    }
}

/// Interpret an optional trailing permission argument
pub(crate) fn permission_flag(arg: Option<&str>) -> CmdResult<bool> {
    match arg {
        None => Ok(false),
        Some(crate::args::PERMISSION_MARK) => Ok(true),
        Some(_) => Err(CmdError::invalid_arg(
            "permission",
            "use ! as the final argument to grant permission",
        )),
    }
}

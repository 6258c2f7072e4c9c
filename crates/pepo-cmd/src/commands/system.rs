//! System commands: pause, directory, comment-enable

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::args::Args;
use crate::capability::OutputMessage;
use crate::command::{Arity, Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};

/// Line that ends comment mode
pub const COMMENT_TERMINATOR: &str = "END#";

/// Register system commands
pub fn register(registry: &mut CommandRegistry) -> CmdResult {
    registry.register(PauseCommand)?;
    registry.register(DirectoryCommand)?;
    registry.register(CommentModeCommand)?;
    Ok(())
}

// ============================================================================
// pause command
// ============================================================================

struct PauseCommand;

impl Command for PauseCommand {
    fn aliases(&self) -> &[&str] {
        &["pause", "delay", "sleep", "pumziko"]
    }

    fn description(&self) -> &str {
        "suspends all pepo activity for specified time interval"
    }

    fn usage(&self) -> &str {
        "pause [SECONDS]"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let seconds = args
            .get_float(0)
            .filter(|s| s.is_finite() && *s > 0.0)
            .ok_or_else(|| {
                CmdError::invalid_arg("seconds", "Please enter a number of seconds > 0")
            })?;
        let duration = Duration::try_from_secs_f64(seconds)
            .map_err(|e| CmdError::invalid_arg("seconds", e.to_string()))?;

        log::debug!("pausing for {:?}", duration);
        thread::sleep(duration);
        Ok(())
    }
}

// ============================================================================
// directory command
// ============================================================================

struct DirectoryCommand;

impl Command for DirectoryCommand {
    fn aliases(&self) -> &[&str] {
        &["directory", "dir", "ls", "folda"]
    }

    fn description(&self) -> &str {
        "lists contents of a directory at the location specified"
    }

    fn usage(&self) -> &str {
        "directory [/absolute/path]"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let dir = PathBuf::from(args.get_str(0).unwrap_or("."));
        if !dir.is_dir() {
            return Err(CmdError::path(dir, "not a directory"));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                name.push('/');
            }
            entries.push(name);
        }
        entries.sort();

        if entries.is_empty() {
            ctx.say(OutputMessage::info(format!("{} is empty", dir.display())));
        }
        for name in entries {
            ctx.print(name);
        }
        Ok(())
    }
}

// ============================================================================
// comment-enable command
// ============================================================================

struct CommentModeCommand;

impl Command for CommentModeCommand {
    fn aliases(&self) -> &[&str] {
        &["comment-enable", "comment-mode", "comments", "fasiri"]
    }

    fn description(&self) -> &str {
        "allows user to make continuous comments until a line reading END#"
    }

    fn usage(&self) -> &str {
        "comment-enable"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        ctx.say(OutputMessage::info(format!(
            "comment mode: type {} to finish",
            COMMENT_TERMINATOR
        )));
        let mut count = 0usize;
        while let Some(line) = ctx.ask("#") {
            if line.trim() == COMMENT_TERMINATOR {
                break;
            }
            count += 1;
        }
        log::debug!("comment mode closed after {} line(s)", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::time::Instant;

    use tempfile::TempDir;

    use crate::capability::{BufferedPrompt, RecordingFeedback};
    use crate::dispatcher::{Dispatcher, LineOutcome};
    use crate::error::CmdError;
    use crate::CommandRegistry;

    fn dispatcher(prompt: BufferedPrompt) -> Dispatcher<BufferedPrompt, RecordingFeedback> {
        let registry = Arc::new(CommandRegistry::with_builtins().unwrap());
        Dispatcher::new(registry, prompt, RecordingFeedback::new())
    }

    #[test]
    fn test_pause() {
        let mut d = dispatcher(BufferedPrompt::new());
        let start = Instant::now();
        assert!(matches!(d.dispatch("pause 0.05"), LineOutcome::Executed(_)));
        assert!(start.elapsed().as_millis() >= 50);
    }

    #[test]
    fn test_pause_rejects_bad_durations() {
        let mut d = dispatcher(BufferedPrompt::new());
        for input in ["pause 0", "pause -2", "pause soon", "pause inf"] {
            assert!(matches!(
                d.dispatch(input),
                LineOutcome::Failed(CmdError::InvalidArgument { .. })
            ));
        }
        assert!(matches!(
            d.dispatch("pause"),
            LineOutcome::Failed(CmdError::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn test_directory_listing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.pep"), "").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let mut d = dispatcher(BufferedPrompt::new());
        d.dispatch(&format!("ls {}", dir.path().display()));
        assert_eq!(d.prompt().texts(), vec!["a/", "b.pep"]);
    }

    #[test]
    fn test_directory_missing() {
        let dir = TempDir::new().unwrap();
        let mut d = dispatcher(BufferedPrompt::new());
        let outcome = d.dispatch(&format!("folda {}", dir.path().join("gone").display()));
        assert!(matches!(outcome, LineOutcome::Failed(CmdError::Path { .. })));
    }

    #[test]
    fn test_comment_mode_until_terminator() {
        let prompt = BufferedPrompt::new()
            .with_answer("first thought")
            .with_answer("END#")
            .with_answer("left for later");
        let mut d = dispatcher(prompt);
        d.dispatch("fasiri");
        // Two questions: one comment line and the terminator
        assert_eq!(d.prompt().questions().len(), 2);
    }

    #[test]
    fn test_comment_mode_ends_on_eof() {
        let mut d = dispatcher(BufferedPrompt::new());
        assert!(matches!(d.dispatch("comments"), LineOutcome::Executed(_)));
    }
}

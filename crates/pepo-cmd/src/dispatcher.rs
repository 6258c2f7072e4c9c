//! Per-line dispatch engine
//!
//! Resolves one line of input against the macro table and the command
//! registry, runs it, and emits feedback for the outcome.

use std::sync::Arc;

use pepo_settings::{id, GlobalSettings};

use crate::args::Args;
use crate::capability::{Feedback, FeedbackKind, OutputMessage, Prompt};
use crate::command::{CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::macro_store::MacroStore;
use crate::parser::{first_token, is_comment, parse_line};
use crate::suggest::suggest;

/// Everything a session mutates, passed explicitly to commands
pub struct ShellState {
    /// Command table, read-only after startup
    pub registry: Arc<CommandRegistry>,
    /// User macros
    pub macros: MacroStore,
    /// Session settings
    pub settings: GlobalSettings,
    /// Set by `quit`; the REPL exits after the current line
    pub quit_requested: bool,
}

impl ShellState {
    /// Create a fresh session around a registry
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            macros: MacroStore::new(Arc::clone(&registry)),
            registry,
            settings: GlobalSettings::new(),
            quit_requested: false,
        }
    }

    /// Suggestion candidates: every alias, then every macro name
    pub fn known_names(&self) -> Vec<&str> {
        let mut names = self.registry.all_aliases();
        names.extend(self.macros.names().iter().map(String::as_str));
        names
    }
}

/// How a dispatched line was resolved
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank line or comment
    Noop,
    /// A command ran successfully (canonical name)
    Executed(String),
    /// A macro was played back
    Macro(String),
    /// The line failed; the error has already been reported
    Failed(CmdError),
}

impl LineOutcome {
    /// Whether the line failed
    pub fn is_failure(&self) -> bool {
        matches!(self, LineOutcome::Failed(_))
    }
}

/// Line dispatcher
///
/// Owns the session state together with the prompt and feedback capabilities.
pub struct Dispatcher<P: Prompt, F: Feedback> {
    state: ShellState,
    prompt: P,
    feedback: F,
    /// Macros currently playing, outermost first
    playing: Vec<String>,
}

impl<P: Prompt, F: Feedback> Dispatcher<P, F> {
    /// Create a dispatcher with a fresh session
    pub fn new(registry: Arc<CommandRegistry>, prompt: P, feedback: F) -> Self {
        Self::with_state(ShellState::new(registry), prompt, feedback)
    }

    /// Create a dispatcher around an existing session
    pub fn with_state(mut state: ShellState, prompt: P, mut feedback: F) -> Self {
        state.settings.check_changed(id::sound);
        feedback.set_audible(state.settings.get_bool(id::sound));
        Self {
            state,
            prompt,
            feedback,
            playing: Vec::new(),
        }
    }

    /// Session state
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Session state, mutably
    pub fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    /// The prompt capability
    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// The prompt capability, mutably
    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    /// The feedback capability
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Whether `quit` has been requested
    pub fn quit_requested(&self) -> bool {
        self.state.quit_requested
    }

    /// Current prompt cursor
    pub fn cursor(&self) -> String {
        self.state.settings.get_string(id::cursor)
    }

    /// Dispatch one line of input
    ///
    /// A line equal to a macro name (case-sensitive) plays the macro; anything
    /// else is parsed as a single command. Errors are reported through the
    /// prompt and never escape.
    pub fn dispatch(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();

        let outcome = if self.state.macros.contains(line) {
            log::debug!("playing macro '{}'", line);
            self.play_macro(line);
            LineOutcome::Macro(line.to_string())
        } else {
            self.dispatch_command(line)
        };

        self.sync_feedback();
        outcome
    }

    /// Resolve a single command line; emits exactly one feedback signal
    fn dispatch_command(&mut self, line: &str) -> LineOutcome {
        let parsed = parse_line(line);
        if parsed.is_noop() {
            self.feedback.notify(FeedbackKind::Neutral);
            return LineOutcome::Noop;
        }
        let Some(command) = parsed.command.as_deref() else {
            self.feedback.notify(FeedbackKind::Neutral);
            return LineOutcome::Noop;
        };

        let Some(cmd) = self.state.registry.lookup(command).cloned() else {
            log::debug!("unknown command '{}'", command);
            let suggestions = self.suggestions(command);
            return self.fail(CmdError::UnknownCommand {
                input: command.to_string(),
                suggestions,
            });
        };

        if let Err(e) = cmd.check_arity(parsed.arguments.len()) {
            return self.fail(e);
        }

        log::debug!("executing '{}' with {} argument(s)", cmd.name(), parsed.arguments.len());
        let result = {
            let mut ctx = CommandContext::new(&mut self.state, &mut self.prompt);
            cmd.execute(&mut ctx, Args::new(&parsed.arguments))
        };
        self.sync_feedback();

        match result {
            Ok(()) => {
                self.feedback.notify(FeedbackKind::Success);
                LineOutcome::Executed(cmd.name().to_string())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Play a macro's lines in order
    ///
    /// Each line stands alone: a failing line is reported and playback moves
    /// on. Playback stops early only when `quit` was requested.
    fn play_macro(&mut self, name: &str) {
        if let Err(e) = self.enter_macro(name) {
            self.fail(e);
            return;
        }

        // Lines may redefine this very macro while it plays
        let lines: Vec<String> = self
            .state
            .macros
            .get(name)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        if lines.is_empty() {
            self.feedback.notify(FeedbackKind::Neutral);
        }
        for line in &lines {
            if self.state.quit_requested {
                break;
            }
            self.play_line(line);
        }

        self.playing.pop();
    }

    fn play_line(&mut self, line: &str) {
        let action = line.trim();

        if is_comment(action) {
            self.prompt.say(OutputMessage::comment(action));
            self.feedback.notify(FeedbackKind::Neutral);
            return;
        }

        if self.state.settings.get_bool(id::echo_macros) {
            let echo = format!("{}{}", self.cursor(), action);
            self.prompt.say(OutputMessage::info(echo));
        }

        match first_token(action) {
            Some(token) if self.state.macros.contains(token) => self.play_macro(token),
            _ => {
                self.dispatch_command(action);
            }
        }
    }

    /// Push a macro onto the playback stack, refusing cycles and runaway nesting
    fn enter_macro(&mut self, name: &str) -> CmdResult {
        if self.playing.iter().any(|playing| playing == name) {
            let mut chain = self.playing.clone();
            chain.push(name.to_string());
            return Err(CmdError::MacroCycle(chain));
        }

        let limit = usize::try_from(self.state.settings.get_int(id::macro_depth_limit))
            .unwrap_or(1)
            .max(1);
        if self.playing.len() >= limit {
            return Err(CmdError::MacroDepth { limit });
        }

        self.playing.push(name.to_string());
        Ok(())
    }

    fn suggestions(&self, input: &str) -> Vec<String> {
        let sensitivity =
            usize::try_from(self.state.settings.get_int(id::suggestion_sensitivity)).unwrap_or(0);
        suggest(input, &self.state.known_names(), sensitivity)
    }

    /// Report an error and emit the failure signal
    fn fail(&mut self, error: CmdError) -> LineOutcome {
        match &error {
            CmdError::UnknownCommand { suggestions, .. } => {
                self.prompt.say(OutputMessage::error("Invalid Command"));
                if !suggestions.is_empty() {
                    self.prompt
                        .say(OutputMessage::info(format!("Did you mean {:?} ?", suggestions)));
                }
            }
            other => self.prompt.say(OutputMessage::error(other.to_string())),
        }
        self.feedback.notify(FeedbackKind::Error);
        LineOutcome::Failed(error)
    }

    fn sync_feedback(&mut self) {
        if self.state.settings.check_changed(id::sound) {
            let audible = self.state.settings.get_bool(id::sound);
            log::debug!("sound {}", if audible { "on" } else { "off" });
            self.feedback.set_audible(audible);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::capability::FeedbackKind::{Error, Neutral, Success};
    use crate::capability::{BufferedPrompt, OutputKind, RecordingFeedback};
    use crate::command::{Arity, Command, FnCommand};

    fn registry() -> Arc<CommandRegistry> {
        let mut registry = CommandRegistry::new();
        registry
            .register(FnCommand::new(
                &["echo", "sema"],
                "print arguments",
                "echo [WORDS...]",
                Arity::at_least(0),
                |ctx, args| {
                    ctx.print(args.as_slice().join(" "));
                    Ok(())
                },
            ))
            .unwrap();
        registry
            .register(FnCommand::new(
                &["quit", "exit"],
                "leave",
                "quit",
                Arity::NONE,
                |ctx, _| {
                    ctx.request_quit();
                    Ok(())
                },
            ))
            .unwrap();
        registry
            .register(FnCommand::new(
                &["sound"],
                "toggle sound",
                "sound",
                Arity::NONE,
                |ctx, _| {
                    let on = ctx.settings().get_bool(id::sound);
                    ctx.settings_mut().set_bool(id::sound, !on)?;
                    Ok(())
                },
            ))
            .unwrap();
        Arc::new(registry)
    }

    fn dispatcher() -> Dispatcher<BufferedPrompt, RecordingFeedback> {
        Dispatcher::new(registry(), BufferedPrompt::new(), RecordingFeedback::new())
    }

    fn define(d: &mut Dispatcher<BufferedPrompt, RecordingFeedback>, name: &str, lines: &[&str]) {
        let lines = lines.iter().map(|s| s.to_string()).collect();
        d.state_mut().macros.define(name, lines, true).unwrap();
    }

    #[test]
    fn test_blank_and_comment_are_neutral() {
        let mut d = dispatcher();
        assert!(matches!(d.dispatch(""), LineOutcome::Noop));
        assert!(matches!(d.dispatch("   "), LineOutcome::Noop));
        assert!(matches!(d.dispatch("# note"), LineOutcome::Noop));
        assert_eq!(d.feedback().signals(), &[Neutral, Neutral, Neutral]);
        assert!(d.prompt().output().is_empty());
    }

    #[test]
    fn test_command_is_case_insensitive_arguments_are_not() {
        let mut d = dispatcher();
        let outcome = d.dispatch("ECHO Hello World");
        assert!(matches!(outcome, LineOutcome::Executed(ref n) if n == "echo"));
        assert_eq!(d.prompt().texts(), vec!["Hello World"]);
        assert_eq!(d.feedback().signals(), &[Success]);
    }

    #[test]
    fn test_unknown_command_suggests() {
        let mut d = dispatcher();
        let outcome = d.dispatch("ecoh");
        match outcome {
            LineOutcome::Failed(CmdError::UnknownCommand { input, suggestions }) => {
                assert_eq!(input, "ecoh");
                assert_eq!(suggestions, vec!["echo"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(d.prompt().texts(), vec!["Invalid Command", "Did you mean [\"echo\"] ?"]);
        assert_eq!(d.feedback().signals(), &[Error]);
    }

    #[test]
    fn test_argument_mismatch_reported_once() {
        let mut d = dispatcher();
        let outcome = d.dispatch("quit now");
        assert!(matches!(
            outcome,
            LineOutcome::Failed(CmdError::ArgumentMismatch { .. })
        ));
        assert!(!d.quit_requested());
        assert_eq!(d.feedback().signals(), &[Error]);
        assert_eq!(d.prompt().output()[0].kind, OutputKind::Error);
    }

    struct Counter {
        runs: AtomicUsize,
    }

    impl Command for Counter {
        fn aliases(&self) -> &[&str] {
            &["count"]
        }

        fn description(&self) -> &str {
            "counts its runs"
        }

        fn usage(&self) -> &str {
            "count [label]"
        }

        fn arity(&self) -> Arity {
            Arity::exactly(1)
        }

        fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_arity_checked_before_execute() {
        let counter = Arc::new(Counter {
            runs: AtomicUsize::new(0),
        });
        let mut registry = CommandRegistry::new();
        registry.register_arc(counter.clone()).unwrap();
        let mut d = Dispatcher::new(Arc::new(registry), BufferedPrompt::new(), RecordingFeedback::new());

        for line in ["count", "count a b"] {
            assert!(matches!(
                d.dispatch(line),
                LineOutcome::Failed(CmdError::ArgumentMismatch { ref command, .. }) if command == "count"
            ));
        }
        assert_eq!(counter.runs.load(Ordering::SeqCst), 0);

        assert!(matches!(d.dispatch("count a"), LineOutcome::Executed(_)));
        assert_eq!(counter.runs.load(Ordering::SeqCst), 1);
        assert_eq!(d.feedback().signals(), &[Error, Error, Success]);
    }

    #[test]
    fn test_macro_lines_each_signal() {
        let mut d = dispatcher();
        define(&mut d, "m", &["#hi", "nonexistentcmd", "echo done"]);
        let outcome = d.dispatch("m");
        assert!(matches!(outcome, LineOutcome::Macro(ref n) if n == "m"));
        assert_eq!(d.feedback().signals(), &[Neutral, Error, Success]);
        assert_eq!(d.prompt().output()[0].kind, OutputKind::Comment);
    }

    #[test]
    fn test_macro_name_is_case_sensitive() {
        let mut d = dispatcher();
        define(&mut d, "Greet", &["echo hi"]);
        assert!(d.dispatch("greet").is_failure());
        assert!(matches!(d.dispatch("  Greet "), LineOutcome::Macro(_)));
    }

    #[test]
    fn test_nested_macro_resolved_lazily() {
        let mut d = dispatcher();
        define(&mut d, "outer", &["inner", "echo after"]);
        // inner does not exist yet: the line is an unknown command
        d.dispatch("outer");
        assert_eq!(d.feedback().signals(), &[Error, Success]);

        define(&mut d, "inner", &["echo in"]);
        d.prompt_mut().take_output();
        d.dispatch("outer");
        assert_eq!(d.prompt().texts(), vec!["in", "after"]);
    }

    #[test]
    fn test_macro_cycle_guarded() {
        let mut d = dispatcher();
        define(&mut d, "a", &["b", "echo a-done"]);
        define(&mut d, "b", &["a", "echo b-done"]);
        d.dispatch("a");

        let texts = d.prompt().texts();
        assert!(texts.iter().any(|t| t.contains("a -> b -> a")));
        assert!(texts.contains(&"b-done"));
        assert!(texts.contains(&"a-done"));
        assert_eq!(d.feedback().signals(), &[Error, Success, Success]);
    }

    #[test]
    fn test_macro_depth_limit() {
        let mut d = dispatcher();
        d.state_mut()
            .settings
            .set_int(id::macro_depth_limit, 2)
            .unwrap();
        define(&mut d, "one", &["two"]);
        define(&mut d, "two", &["three"]);
        define(&mut d, "three", &["echo deep"]);
        d.dispatch("one");
        assert!(d.prompt().texts()[0].contains("maximum macro depth (2)"));
        assert_eq!(d.feedback().signals(), &[Error]);
    }

    #[test]
    fn test_quit_stops_playback() {
        let mut d = dispatcher();
        define(&mut d, "bye", &["echo first", "quit", "echo never"]);
        d.dispatch("bye");
        assert!(d.quit_requested());
        assert_eq!(d.prompt().texts(), vec!["first"]);
    }

    #[test]
    fn test_empty_macro_is_neutral() {
        let mut d = dispatcher();
        define(&mut d, "nothing", &[]);
        d.dispatch("nothing");
        assert_eq!(d.feedback().signals(), &[Neutral]);
    }

    #[test]
    fn test_echo_macros_setting() {
        let mut d = dispatcher();
        d.state_mut().settings.set_bool(id::echo_macros, true).unwrap();
        define(&mut d, "m", &["echo x"]);
        d.dispatch("m");
        assert_eq!(d.prompt().texts(), vec![">> echo x", "x"]);
    }

    #[test]
    fn test_sound_setting_reaches_feedback() {
        let mut d = dispatcher();
        assert!(!d.feedback().is_audible());
        d.dispatch("sound");
        assert!(d.feedback().is_audible());
        d.dispatch("sound");
        assert!(!d.feedback().is_audible());
    }
}

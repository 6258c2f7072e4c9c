//! Command trait and registry
//!
//! Defines the interface for commands and the registry that maps aliases to
//! implementations.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use pepo_settings::GlobalSettings;

use crate::args::Args;
use crate::capability::{OutputMessage, Prompt};
use crate::dispatcher::ShellState;
use crate::error::{CmdError, CmdResult};
use crate::macro_store::MacroStore;

/// Number of positional arguments a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Minimum number of arguments
    pub min: usize,
    /// Maximum number of arguments (None = unbounded)
    pub max: Option<usize>,
}

impl Arity {
    /// No arguments
    pub const NONE: Arity = Arity::exactly(0);

    /// Exactly `n` arguments
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// Between `min` and `max` arguments, inclusive
    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    /// At least `min` arguments
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Whether `count` arguments are acceptable
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Check that the declaration itself is consistent
    pub fn validate(&self) -> Result<(), String> {
        match self.max {
            Some(max) if max < self.min => {
                Err(format!("max arity {} is below min arity {}", max, self.min))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{} or more", self.min),
        }
    }
}

/// Command execution context
///
/// Gives a command access to the shell state (registry, macros, settings)
/// and to the prompt capability.
pub struct CommandContext<'a> {
    /// Shell state
    pub state: &'a mut ShellState,
    prompt: &'a mut dyn Prompt,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context
    pub fn new(state: &'a mut ShellState, prompt: &'a mut dyn Prompt) -> Self {
        Self { state, prompt }
    }

    /// The command registry
    pub fn registry(&self) -> &CommandRegistry {
        &self.state.registry
    }

    /// The macro store
    pub fn macros(&self) -> &MacroStore {
        &self.state.macros
    }

    /// The macro store, mutably
    pub fn macros_mut(&mut self) -> &mut MacroStore {
        &mut self.state.macros
    }

    /// Session settings
    pub fn settings(&self) -> &GlobalSettings {
        &self.state.settings
    }

    /// Session settings, mutably
    pub fn settings_mut(&mut self) -> &mut GlobalSettings {
        &mut self.state.settings
    }

    /// Ask the shell to exit once the current line finishes
    pub fn request_quit(&mut self) {
        self.state.quit_requested = true;
    }

    /// Show a message
    pub fn say(&mut self, message: OutputMessage) {
        self.prompt.say(message);
    }

    /// Print plain output
    pub fn print(&mut self, msg: impl Into<String>) {
        self.prompt.say(OutputMessage::normal(msg));
    }

    /// Print a success message
    pub fn ok(&mut self, msg: impl Into<String>) {
        self.prompt.say(OutputMessage::success(msg));
    }

    /// Print a warning
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.prompt.say(OutputMessage::warning(msg));
    }

    /// Print an error message without failing the command
    pub fn error(&mut self, msg: impl Into<String>) {
        self.prompt.say(OutputMessage::error(msg));
    }

    /// Ask a yes/no question
    pub fn confirm(&mut self, question: &str) -> bool {
        self.prompt.confirm(question)
    }

    /// Ask for a line of text
    pub fn ask(&mut self, question: &str) -> Option<String> {
        self.prompt.ask(question)
    }

    /// Collect a block of lines
    pub fn multiline(&mut self, instructions: &str) -> Vec<String> {
        self.prompt.multiline(instructions)
    }

    /// Clear the screen
    pub fn clear_screen(&mut self) {
        self.prompt.clear_screen();
    }
}

/// Trait for command implementations
///
/// A command has one or more aliases (first canonical, last the idiom), a
/// declared arity and an action. The dispatcher checks the argument count
/// against `arity` before calling `execute`, so actions never see a count
/// outside it.
pub trait Command: Send + Sync {
    /// All names this command answers to
    fn aliases(&self) -> &[&str];

    /// One-line description
    fn description(&self) -> &str;

    /// Usage example
    fn usage(&self) -> &str;

    /// Declared number of positional arguments
    fn arity(&self) -> Arity {
        Arity::NONE
    }

    /// Execute the command
    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult;

    /// Canonical name
    fn name(&self) -> &str {
        self.aliases().first().copied().unwrap_or_default()
    }

    /// Localized alternate name
    fn idiom(&self) -> &str {
        self.aliases().last().copied().unwrap_or_default()
    }

    /// Reject an argument count outside the declared arity
    fn check_arity(&self, got: usize) -> CmdResult {
        let arity = self.arity();
        if arity.accepts(got) {
            Ok(())
        } else {
            Err(CmdError::ArgumentMismatch {
                command: self.name().to_string(),
                expected: arity.to_string(),
                got,
                usage: self.usage().to_string(),
            })
        }
    }

    /// Help summary
    fn summary(&self) -> String {
        format!(
            "{} // {}\n syntax: {}\n aliases: {}\n{}",
            self.name(),
            self.idiom(),
            self.usage(),
            self.aliases().join(", "),
            self.description()
        )
    }
}

type Action = dyn Fn(&mut CommandContext<'_>, Args<'_>) -> CmdResult + Send + Sync;

/// Command built from a closure plus its metadata
pub struct FnCommand {
    aliases: Vec<&'static str>,
    description: &'static str,
    usage: &'static str,
    arity: Arity,
    action: Box<Action>,
}

impl FnCommand {
    /// Bind an action to its aliases and metadata
    pub fn new<F>(
        aliases: &[&'static str],
        description: &'static str,
        usage: &'static str,
        arity: Arity,
        action: F,
    ) -> Self
    where
        F: Fn(&mut CommandContext<'_>, Args<'_>) -> CmdResult + Send + Sync + 'static,
    {
        Self {
            aliases: aliases.to_vec(),
            description,
            usage,
            arity,
            action: Box::new(action),
        }
    }
}

impl Command for FnCommand {
    fn aliases(&self) -> &[&str] {
        &self.aliases
    }

    fn description(&self) -> &str {
        self.description
    }

    fn usage(&self) -> &str {
        self.usage
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        (self.action)(ctx, args)
    }
}

impl fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

struct Entry {
    command: Arc<dyn Command>,
    /// Normalized (lower-case) aliases, in declaration order
    aliases: Vec<String>,
}

/// Registry mapping aliases to command implementations
///
/// Built once at startup and read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    /// Commands in registration order
    entries: Vec<Entry>,
    /// Normalized alias -> index into `entries`
    index: AHashMap<String, usize>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in commands registered
    pub fn with_builtins() -> CmdResult<Self> {
        let mut registry = Self::new();
        crate::commands::register_all(&mut registry)?;
        Ok(registry)
    }

    /// Register a command
    pub fn register<C: Command + 'static>(&mut self, cmd: C) -> CmdResult {
        self.register_arc(Arc::new(cmd))
    }

    /// Register a command with an Arc
    ///
    /// Fails without touching the registry if any alias is already taken,
    /// repeated within the command, or malformed.
    pub fn register_arc(&mut self, cmd: Arc<dyn Command>) -> CmdResult {
        if cmd.aliases().is_empty() {
            return Err(CmdError::InvalidRegistration(
                "command declares no aliases".to_string(),
            ));
        }
        cmd.arity().validate().map_err(|reason| {
            CmdError::InvalidRegistration(format!("'{}': {}", cmd.name(), reason))
        })?;

        let mut aliases: Vec<String> = Vec::with_capacity(cmd.aliases().len());
        for alias in cmd.aliases() {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(CmdError::InvalidRegistration(format!(
                    "'{}': alias '{}' must be a single non-empty word",
                    cmd.name(),
                    alias
                )));
            }
            let alias = alias.to_lowercase();
            if let Some(&existing) = self.index.get(&alias) {
                return Err(CmdError::DuplicateAlias {
                    alias,
                    existing: self.entries[existing].command.name().to_string(),
                });
            }
            if aliases.contains(&alias) {
                return Err(CmdError::DuplicateAlias {
                    alias,
                    existing: cmd.name().to_string(),
                });
            }
            aliases.push(alias);
        }

        let position = self.entries.len();
        for alias in &aliases {
            self.index.insert(alias.clone(), position);
        }
        log::debug!("registered command '{}' ({} aliases)", cmd.name(), aliases.len());
        self.entries.push(Entry {
            command: cmd,
            aliases,
        });
        Ok(())
    }

    /// Look up a command by any of its aliases
    pub fn lookup(&self, token: &str) -> Option<&Arc<dyn Command>> {
        let idx = match self.index.get(token) {
            Some(idx) => *idx,
            None => *self.index.get(&token.to_lowercase())?,
        };
        self.entries.get(idx).map(|entry| &entry.command)
    }

    /// Check if a token names a command
    pub fn contains(&self, token: &str) -> bool {
        self.lookup(token).is_some()
    }

    /// Whether a name exactly equals a registered alias
    pub fn is_reserved(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every alias of every command, in registration order
    pub fn all_aliases(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.aliases.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Iterate over commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.entries.iter().map(|entry| &entry.command)
    }

    /// Get the number of registered commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCommand {
        aliases: Vec<&'static str>,
    }

    impl Command for TestCommand {
        fn aliases(&self) -> &[&str] {
            &self.aliases
        }

        fn description(&self) -> &str {
            "Test command"
        }

        fn usage(&self) -> &str {
            "test"
        }

        fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
            Ok(())
        }
    }

    fn test_command(aliases: &[&'static str]) -> TestCommand {
        TestCommand {
            aliases: aliases.to_vec(),
        }
    }

    #[test]
    fn test_lookup_by_every_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(test_command(&["sound", "volume", "sauti"])).unwrap();
        registry.register(test_command(&["quit", "exit", "acha"])).unwrap();

        let sound = registry.lookup("sound").unwrap().clone();
        for alias in ["volume", "sauti"] {
            assert!(Arc::ptr_eq(&sound, registry.lookup(alias).unwrap()));
        }
        let quit = registry.lookup("exit").unwrap();
        assert!(!Arc::ptr_eq(&sound, quit));
        assert_eq!(quit.name(), "quit");
        assert_eq!(quit.idiom(), "acha");
        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn test_duplicate_alias_rejected_atomically() {
        let mut registry = CommandRegistry::new();
        registry.register(test_command(&["clear", "cls"])).unwrap();

        let err = registry
            .register(test_command(&["wipe", "cls", "futa"]))
            .unwrap_err();
        assert!(matches!(
            err,
            CmdError::DuplicateAlias { ref alias, ref existing } if alias == "cls" && existing == "clear"
        ));

        // Nothing from the failed registration leaked in
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("wipe").is_none());
        assert_eq!(registry.all_aliases(), vec!["clear", "cls"]);
    }

    #[test]
    fn test_duplicate_alias_within_one_command() {
        let mut registry = CommandRegistry::new();
        let err = registry.register(test_command(&["help", "HELP"])).unwrap_err();
        assert!(matches!(err, CmdError::DuplicateAlias { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_aliases_rejected() {
        let mut registry = CommandRegistry::new();
        assert!(matches!(
            registry.register(test_command(&[])),
            Err(CmdError::InvalidRegistration(_))
        ));
        assert!(matches!(
            registry.register(test_command(&["two words"])),
            Err(CmdError::InvalidRegistration(_))
        ));
    }

    #[test]
    fn test_invalid_arity_rejected() {
        let mut registry = CommandRegistry::new();
        let cmd = FnCommand::new(&["broken"], "", "broken", Arity { min: 2, max: Some(1) }, |_, _| Ok(()));
        assert!(matches!(
            registry.register(cmd),
            Err(CmdError::InvalidRegistration(_))
        ));
    }

    #[test]
    fn test_aliases_are_case_insensitive_but_reservation_is_exact() {
        let mut registry = CommandRegistry::new();
        registry.register(test_command(&["Macros", "mikato"])).unwrap();
        assert!(registry.lookup("MACROS").is_some());
        assert!(registry.is_reserved("macros"));
        assert!(!registry.is_reserved("Macros"));
    }

    #[test]
    fn test_arity() {
        assert!(Arity::NONE.accepts(0));
        assert!(!Arity::NONE.accepts(1));
        assert!(Arity::range(1, 2).accepts(2));
        assert!(!Arity::range(1, 2).accepts(3));
        assert!(Arity::at_least(1).accepts(40));
        assert_eq!(Arity::exactly(1).to_string(), "1");
        assert_eq!(Arity::range(0, 1).to_string(), "0..1");
        assert_eq!(Arity::at_least(1).to_string(), "1 or more");
    }

    #[test]
    fn test_summary() {
        let cmd = FnCommand::new(
            &["pause", "sleep", "pumziko"],
            "suspends activity",
            "pause [SECONDS]",
            Arity::exactly(1),
            |_, _| Ok(()),
        );
        let summary = cmd.summary();
        assert!(summary.starts_with("pause // pumziko"));
        assert!(summary.contains("syntax: pause [SECONDS]"));
    }

    #[test]
    fn test_check_arity_error() {
        let cmd = test_command(&["test"]);
        match cmd.check_arity(2) {
            Err(CmdError::ArgumentMismatch { command, expected, got, .. }) => {
                assert_eq!(command, "test");
                assert_eq!(expected, "0");
                assert_eq!(got, 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}

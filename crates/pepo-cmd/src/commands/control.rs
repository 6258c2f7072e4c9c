//! Control commands: quit, help, commands, idioms, clear, refresh

use crate::args::Args;
use crate::capability::OutputMessage;
use crate::command::{Arity, Command, CommandContext, CommandRegistry, FnCommand};
use crate::error::{CmdError, CmdResult};

/// Register control commands
pub fn register(registry: &mut CommandRegistry) -> CmdResult {
    registry.register(QuitCommand)?;
    registry.register(HelpCommand)?;
    registry.register(CommandsCommand)?;
    registry.register(FnCommand::new(
        &["idioms", "misemo"],
        "returns a list of all commands as their respective idioms",
        "idioms",
        Arity::NONE,
        |ctx, _args| {
            let lines: Vec<String> = ctx
                .registry()
                .commands()
                .map(|cmd| format!("{} = {}", cmd.name(), cmd.idiom()))
                .collect();
            for line in lines {
                ctx.print(line);
            }
            Ok(())
        },
    ))?;
    registry.register(FnCommand::new(
        &["clear", "cls", "clear_screen", "safisha"],
        "clears the screen of all text",
        "clear",
        Arity::NONE,
        |ctx, _args| {
            ctx.clear_screen();
            Ok(())
        },
    ))?;
    registry.register(RefreshCommand)?;
    Ok(())
}

const GENERAL_HELP: &str = "\
Type a command and press RETURN. Commands are case-insensitive; macro names are not.

    commands            list every command
    help [command]      show how a command is used
    idioms              list every command's idiom
    set-macro NAME      record a macro line by line
    set-macro NAME a; b define a macro on one line
    NAME                play a macro
    quit                leave pepo

Lines starting with # are comments.";

// ============================================================================
// quit command
// ============================================================================

struct QuitCommand;

impl Command for QuitCommand {
    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "stop", "acha"]
    }

    fn description(&self) -> &str {
        "immediately stops all processes and exits the program"
    }

    fn usage(&self) -> &str {
        "quit"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        ctx.say(OutputMessage::info("Kwa Heri"));
        ctx.request_quit();
        Ok(())
    }
}

// ============================================================================
// help command
// ============================================================================

struct HelpCommand;

impl Command for HelpCommand {
    fn aliases(&self) -> &[&str] {
        &["help", "info", "habari"]
    }

    fn description(&self) -> &str {
        "gives information on a given command"
    }

    fn usage(&self) -> &str {
        "help [command]"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let Some(topic) = args.get_str(0) else {
            ctx.print(GENERAL_HELP);
            return Ok(());
        };

        let summary = ctx
            .registry()
            .lookup(topic)
            .map(|cmd| cmd.summary())
            .ok_or_else(|| CmdError::not_found(format!("no command named '{}'", topic)))?;
        ctx.print(summary);
        Ok(())
    }
}

// ============================================================================
// commands command
// ============================================================================

struct CommandsCommand;

impl Command for CommandsCommand {
    fn aliases(&self) -> &[&str] {
        &["commands", "list-commands", "command-list", "amri"]
    }

    fn description(&self) -> &str {
        "lists all valid commands"
    }

    fn usage(&self) -> &str {
        "commands"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        let mut lines: Vec<String> = ctx
            .registry()
            .commands()
            .map(|cmd| format!("{}  ||  {}", cmd.name(), cmd.description()))
            .collect();
        lines.sort();
        for line in lines {
            ctx.print(line);
        }
        Ok(())
    }
}

// ============================================================================
// refresh command
// ============================================================================

struct RefreshCommand;

impl Command for RefreshCommand {
    fn aliases(&self) -> &[&str] {
        &["refresh", "renew", "erase", "upya"]
    }

    fn description(&self) -> &str {
        "refreshes the session: forgets every macro and restores default settings"
    }

    fn usage(&self) -> &str {
        "refresh"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        let dropped = ctx.macros().len();
        ctx.macros_mut().clear();
        ctx.settings_mut().reset_all();
        ctx.clear_screen();
        log::info!("session refreshed, {} macro(s) dropped", dropped);
        ctx.ok("session refreshed");
        Ok(())
    }
}

//! Settings commands: suggestions, sound, set, get, unset, settings

use pepo_settings::{get_setting, get_setting_id, id, SettingError};

use crate::args::Args;
use crate::capability::OutputMessage;
use crate::command::{Arity, Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::suggest::MAX_SENSITIVITY;

/// Register settings commands
pub fn register(registry: &mut CommandRegistry) -> CmdResult {
    registry.register(SuggestionsCommand)?;
    registry.register(SoundCommand)?;
    registry.register(SetCommand)?;
    registry.register(GetCommand)?;
    registry.register(UnsetCommand)?;
    registry.register(ListSettingsCommand)?;
    Ok(())
}

fn lookup_id(name: &str) -> CmdResult<u16> {
    get_setting_id(name).ok_or_else(|| SettingError::not_found_name(name).into())
}

// ============================================================================
// suggestions command
// ============================================================================

struct SuggestionsCommand;

impl SuggestionsCommand {
    fn parse(text: &str) -> CmdResult<i32> {
        text.trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= MAX_SENSITIVITY)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                CmdError::invalid_arg(
                    "sensitivity",
                    format!("pick a number from 0..{}", MAX_SENSITIVITY),
                )
            })
    }
}

impl Command for SuggestionsCommand {
    fn aliases(&self) -> &[&str] {
        &["suggestions", "hints", "do-you-mean", "madokezo"]
    }

    fn description(&self) -> &str {
        "adjust the suggestion sensitivity to receive more or less hints per invalid command"
    }

    fn usage(&self) -> &str {
        "suggestions [0..10]"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let current = ctx.settings().get_int(id::suggestion_sensitivity);
        let level = match args.get_str(0) {
            Some(text) => Self::parse(text)?,
            None => {
                let question = format!("Suggestion sensitivity (0..{}) [{}]", MAX_SENSITIVITY, current);
                match ctx.ask(&question) {
                    Some(answer) if !answer.trim().is_empty() => Self::parse(&answer)?,
                    _ => current,
                }
            }
        };

        ctx.settings_mut().set_int(id::suggestion_sensitivity, level)?;
        if level != current {
            ctx.ok(format!("suggestion sensitivity set to {}", level));
        }
        Ok(())
    }
}

// ============================================================================
// sound command
// ============================================================================

struct SoundCommand;

impl Command for SoundCommand {
    fn aliases(&self) -> &[&str] {
        &["sound", "sounds", "volume", "sauti"]
    }

    fn description(&self) -> &str {
        "turn ON/OFF sound for pepo cli"
    }

    fn usage(&self) -> &str {
        "sound [on|off]"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let audible = match args.get_str(0) {
            None => !ctx.settings().get_bool(id::sound),
            Some(arg) if arg.eq_ignore_ascii_case("on") => true,
            Some(arg) if arg.eq_ignore_ascii_case("off") => false,
            Some(_) => return Err(CmdError::invalid_arg("sound", "please select on/off")),
        };

        ctx.settings_mut().set_bool(id::sound, audible)?;
        ctx.ok(format!("Program Sound {}", if audible { "ON" } else { "OFF" }));
        Ok(())
    }
}

// ============================================================================
// set command
// ============================================================================

struct SetCommand;

impl Command for SetCommand {
    fn aliases(&self) -> &[&str] {
        &["set"]
    }

    fn description(&self) -> &str {
        "changes a setting value"
    }

    fn usage(&self) -> &str {
        "set [name] [value]"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let name = args.get_str(0).unwrap_or_default();
        let text = args.get_str(1).unwrap_or_default();

        let id = ctx.settings_mut().set_from_str(name, text)?;
        let value = ctx.settings().get(id).ok_or_else(|| SettingError::not_found_id(id))?;
        log::debug!("setting {} = {}", name, value);
        ctx.ok(format!("{} = {}", name, value));
        Ok(())
    }
}

// ============================================================================
// get command
// ============================================================================

struct GetCommand;

impl Command for GetCommand {
    fn aliases(&self) -> &[&str] {
        &["get"]
    }

    fn description(&self) -> &str {
        "prints a setting value and what the setting does"
    }

    fn usage(&self) -> &str {
        "get [name]"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let name = args.get_str(0).unwrap_or_default();
        let id = lookup_id(name)?;
        let setting = get_setting(id).ok_or_else(|| SettingError::not_found_id(id))?;
        let value = ctx.settings().get_by_name(name)?;
        ctx.print(format!("{} = {}", name, value));
        ctx.say(OutputMessage::info(setting.description));
        Ok(())
    }
}

// ============================================================================
// unset command
// ============================================================================

struct UnsetCommand;

impl Command for UnsetCommand {
    fn aliases(&self) -> &[&str] {
        &["unset"]
    }

    fn description(&self) -> &str {
        "restores a setting to its default value"
    }

    fn usage(&self) -> &str {
        "unset [name]"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let name = args.get_str(0).unwrap_or_default();
        let id = lookup_id(name)?;
        ctx.settings_mut().unset(id);

        let default = get_setting(id)
            .map(pepo_settings::default_value)
            .ok_or_else(|| SettingError::not_found_id(id))?;
        ctx.ok(format!("{} = {} (default)", name, default));
        Ok(())
    }
}

// ============================================================================
// settings command
// ============================================================================

struct ListSettingsCommand;

impl Command for ListSettingsCommand {
    fn aliases(&self) -> &[&str] {
        &["settings", "list-settings", "mipangilio"]
    }

    fn description(&self) -> &str {
        "lists every setting with its current value; * marks values changed this session"
    }

    fn usage(&self) -> &str {
        "settings"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        let lines: Vec<String> = ctx
            .settings()
            .export_all()
            .into_iter()
            .map(|(setting, value)| {
                let mark = if ctx.settings().is_defined(setting.id) { "*" } else { " " };
                format!("{} {} = {}  ||  {}", mark, setting.name, value, setting.description)
            })
            .collect();
        for line in lines {
            ctx.print(line);
        }
        Ok(())
    }
}

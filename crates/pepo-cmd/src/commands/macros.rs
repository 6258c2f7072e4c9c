//! Macro commands: set-macro, macros, load-macro, get-macro, export-macro, delete-macro

use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::capability::{OutputKind, OutputMessage};
use crate::command::{Arity, Command, CommandContext, CommandRegistry};
use crate::error::{CmdError, CmdResult};
use crate::macro_store::MacroStore;
use crate::parser::{first_token, is_comment, split_definition};

use super::{permission_flag, with_confirmation};

/// Register macro commands
pub fn register(registry: &mut CommandRegistry) -> CmdResult {
    registry.register(SetMacroCommand)?;
    registry.register(ListMacrosCommand)?;
    registry.register(LoadMacroCommand)?;
    registry.register(GetMacroCommand)?;
    registry.register(ExportMacroCommand)?;
    registry.register(DeleteMacroCommand)?;
    Ok(())
}

const RECORDING_INSTRUCTIONS: &str = "\
Type in specific command-line commands/actions for macro to execute.
Each line may only have one command. You cannot edit a line further once you press RETURN.
Any previous instructions for a same-name macro will be overwritten instead of appended.";

/// What a stored macro line would do if played now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Runs a registered command
    Command,
    /// Plays another macro
    Macro,
    /// Comment, echoed during playback
    Comment,
    /// Blank, does nothing
    Blank,
    /// Would fail as an unknown command
    Invalid,
}

impl LineKind {
    fn output_kind(self) -> OutputKind {
        match self {
            LineKind::Command | LineKind::Blank => OutputKind::Normal,
            LineKind::Macro => OutputKind::Info,
            LineKind::Comment => OutputKind::Comment,
            LineKind::Invalid => OutputKind::Warning,
        }
    }
}

/// Classify a macro line against the current registry and macro table
///
/// Mirrors playback resolution: comments first, then macro names
/// (case-sensitive), then command aliases (case-insensitive).
pub fn classify_line(registry: &CommandRegistry, macros: &MacroStore, line: &str) -> LineKind {
    let line = line.trim();
    if is_comment(line) {
        return LineKind::Comment;
    }
    match first_token(line) {
        None => LineKind::Blank,
        Some(token) if macros.contains(token) => LineKind::Macro,
        Some(token) if registry.contains(token) => LineKind::Command,
        Some(_) => LineKind::Invalid,
    }
}

fn absolute_path(text: &str) -> CmdResult<PathBuf> {
    let path = PathBuf::from(text);
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(CmdError::path(path, "please use an absolute file path"))
    }
}

// ============================================================================
// set-macro command
// ============================================================================

struct SetMacroCommand;

impl Command for SetMacroCommand {
    fn aliases(&self) -> &[&str] {
        &["set-macro", "macro", "mkato!"]
    }

    fn description(&self) -> &str {
        "records a series of commands under a name; play it back by typing the name"
    }

    fn usage(&self) -> &str {
        "set-macro [name] [action; action...]"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let values = args.as_slice();
        let name = values[0].as_str();
        if ctx.registry().is_reserved(name) {
            return Err(CmdError::ReservedName(name.to_string()));
        }

        let lines = if values.len() > 1 {
            split_definition(&values[1..])
        } else {
            ctx.multiline(RECORDING_INSTRUCTIONS)
        };

        let created = with_confirmation(ctx, false, |ctx, granted| {
            ctx.macros_mut().define(name, lines.clone(), granted)
        })?;
        if created.is_some() {
            log::debug!("macro '{}' defined with {} line(s)", name, lines.len());
            ctx.ok(format!("Macro {} has been created.", name));
        }
        Ok(())
    }
}

// ============================================================================
// macros command
// ============================================================================

struct ListMacrosCommand;

impl Command for ListMacrosCommand {
    fn aliases(&self) -> &[&str] {
        &["macros", "list-macros", "ls-macro", "macro-list", "mikato"]
    }

    fn description(&self) -> &str {
        "lists the names of all loaded macros"
    }

    fn usage(&self) -> &str {
        "macros"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: Args<'_>) -> CmdResult {
        if ctx.macros().is_empty() {
            ctx.say(OutputMessage::info("no macros loaded"));
        } else {
            let names = ctx.macros().names().join(" ");
            ctx.print(names);
        }
        Ok(())
    }
}

// ============================================================================
// load-macro command
// ============================================================================

struct LoadMacroCommand;

impl LoadMacroCommand {
    fn load_file(ctx: &mut CommandContext<'_>, path: &Path, force: bool) -> CmdResult {
        if !force && !ctx.confirm("Are you sure you want to load this macro?") {
            return Ok(());
        }
        let imported = with_confirmation(ctx, force, |ctx, granted| {
            ctx.macros_mut().import_file(path, granted)
        })?;
        if let Some(name) = imported {
            ctx.ok(format!("Macro {} has been loaded.", name));
        }
        Ok(())
    }

    fn load_dir(ctx: &mut CommandContext<'_>, dir: &Path, force: bool) -> CmdResult {
        let count = MacroStore::macro_files(dir)?.len();
        if count == 0 {
            ctx.say(OutputMessage::info(format!("no .pep files in {}", dir.display())));
            return Ok(());
        }
        let question = format!("There are {} macros in the given directory. Import all?", count);
        if !force && !ctx.confirm(&question) {
            return Ok(());
        }

        let report = ctx.macros_mut().import_dir(dir, force)?;
        let mut loaded = 0;
        for (path, result) in report {
            let result = match result {
                Err(CmdError::ConfirmationRequired(_)) => with_confirmation(ctx, false, |ctx, granted| {
                    ctx.macros_mut().import_file(&path, granted)
                }),
                other => other.map(Some),
            };
            match result {
                Ok(Some(name)) => {
                    loaded += 1;
                    ctx.ok(format!("Macro {} has been loaded.", name));
                }
                Ok(None) => {}
                Err(e) => ctx.error(format!("{}: {}", path.display(), e)),
            }
        }
        ctx.print(format!("loaded {} of {} macro file(s)", loaded, count));
        Ok(())
    }
}

impl Command for LoadMacroCommand {
    fn aliases(&self) -> &[&str] {
        &["load-macro", "pep-to-macro", "import", "import-macro", "pep2mkato"]
    }

    fn description(&self) -> &str {
        "loads a .pep file, or every .pep file in a directory, as macros"
    }

    fn usage(&self) -> &str {
        "load-macro [/absolute/path] [!]"
    }

    fn arity(&self) -> Arity {
        Arity::range(1, 2)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let path = absolute_path(args.get_str(0).unwrap_or_default())?;
        let force = permission_flag(args.get_str(1))?;

        if path.is_dir() {
            Self::load_dir(ctx, &path, force)
        } else if path.is_file() {
            Self::load_file(ctx, &path, force)
        } else {
            Err(CmdError::path(path, "unable to resolve file/directory"))
        }
    }
}

// ============================================================================
// get-macro command
// ============================================================================

struct GetMacroCommand;

impl Command for GetMacroCommand {
    fn aliases(&self) -> &[&str] {
        &["get-macro", "mkato?"]
    }

    fn description(&self) -> &str {
        "prints the series of commands a macro will execute"
    }

    fn usage(&self) -> &str {
        "get-macro [macro_name]"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let name = args.get_str(0).unwrap_or_default();
        let messages: Vec<OutputMessage> = {
            let macros = ctx.macros();
            let lines = macros
                .get(name)
                .ok_or_else(|| CmdError::not_found(format!("macro '{}'", name)))?;
            lines
                .iter()
                .map(|line| {
                    let kind = classify_line(ctx.registry(), macros, line);
                    OutputMessage::new(line.clone(), kind.output_kind())
                })
                .collect()
        };

        for message in messages {
            ctx.say(message);
        }
        Ok(())
    }
}

// ============================================================================
// export-macro command
// ============================================================================

struct ExportMacroCommand;

impl Command for ExportMacroCommand {
    fn aliases(&self) -> &[&str] {
        &["export-macro", "macro-to-pep", "export", "mkato2pep"]
    }

    fn description(&self) -> &str {
        "export any/all macros"
    }

    fn usage(&self) -> &str {
        "export-macro [directory] [macro_name...] [!]"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let force = args.has_permission_mark();
        let values = args.without_permission_mark();
        let Some((dir, names)) = values.split_first() else {
            return Err(CmdError::invalid_arg("directory", "missing export directory"));
        };
        let dir = PathBuf::from(dir);

        if names.is_empty() && ctx.macros().is_empty() {
            ctx.say(OutputMessage::info("no macros to export"));
            return Ok(());
        }

        let report = with_confirmation(ctx, force, |ctx, granted| {
            ctx.macros().export(&dir, names, granted)
        })?;

        for (name, result) in report.unwrap_or_default() {
            match result {
                Ok(_) => ctx.ok(format!("Written {}.pep to {}", name, dir.display())),
                Err(e) => ctx.error(e.to_string()),
            }
        }
        Ok(())
    }
}

// ============================================================================
// delete-macro command
// ============================================================================

struct DeleteMacroCommand;

impl Command for DeleteMacroCommand {
    fn aliases(&self) -> &[&str] {
        &["delete-macro", "macro-delete", "del-mac", "mkatokufa"]
    }

    fn description(&self) -> &str {
        "removes a macro from memory"
    }

    fn usage(&self) -> &str {
        "delete-macro [macro_name] [!]"
    }

    fn arity(&self) -> Arity {
        Arity::range(1, 2)
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: Args<'_>) -> CmdResult {
        let name = args.get_str(0).unwrap_or_default();
        let force = permission_flag(args.get_str(1))?;

        let deleted = with_confirmation(ctx, force, |ctx, granted| {
            ctx.macros_mut().delete(name, granted)
        })?;
        if deleted.is_some() {
            ctx.ok(format!("{} was deleted.", name));
        }
        Ok(())
    }
}

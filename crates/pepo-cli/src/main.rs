//! Pepo interactive shell
//!
//! Run with:
//! ```bash
//! cargo run -p pepo-cli
//! cargo run -p pepo-cli -- --set sound=on /path/to/macros
//! ```
//!
//! Type `help` at the prompt for an overview, `commands` for the full list.

mod config;
mod error;
mod terminal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pepo_cmd::{CommandRegistry, Dispatcher, Feedback, OutputMessage, Prompt, ShellState};

use crate::config::Config;
use crate::error::CliError;
use crate::terminal::{BellFeedback, TerminalPrompt};

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("pepo: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), CliError> {
    let registry = Arc::new(CommandRegistry::with_builtins()?);
    log::info!("registered {} commands", registry.len());

    let mut state = ShellState::new(registry);
    config.apply(&mut state.settings)?;

    let prompt = TerminalPrompt::new()?;
    let mut shell = Dispatcher::with_state(state, prompt, BellFeedback::stdout());

    for path in &config.macro_paths {
        import_at_startup(&mut shell, path);
    }

    shell.prompt_mut().say(OutputMessage::info(
        "pepo: type `help` for an overview, `quit` to leave",
    ));

    while !shell.quit_requested() {
        let cursor = shell.cursor();
        let Some(line) = shell.prompt_mut().read_line(&cursor)? else {
            break;
        };
        shell.dispatch(&line);
    }

    log::info!("session closed");
    Ok(())
}

/// Import a macro file or directory named on the command line
///
/// Startup imports never ask: existing names are overwritten. Failures are
/// shown and the shell still starts.
fn import_at_startup<P: Prompt, F: Feedback>(shell: &mut Dispatcher<P, F>, path: &Path) {
    let path = match absolute(path) {
        Ok(path) => path,
        Err(e) => {
            shell
                .prompt_mut()
                .say(OutputMessage::error(format!("{}: {}", path.display(), e)));
            return;
        }
    };

    let results = if path.is_dir() {
        match shell.state_mut().macros.import_dir(&path, true) {
            Ok(report) => report,
            Err(e) => vec![(path.clone(), Err(e))],
        }
    } else {
        let result = shell.state_mut().macros.import_file(&path, true);
        vec![(path.clone(), result)]
    };

    for (file, result) in results {
        let message = match result {
            Ok(name) => OutputMessage::success(format!("Macro {} has been loaded.", name)),
            Err(e) => OutputMessage::error(format!("{}: {}", file.display(), e)),
        };
        shell.prompt_mut().say(message);
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

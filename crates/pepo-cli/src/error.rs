//! Errors that end the `pepo` process

use std::path::PathBuf;

use pepo_cmd::CmdError;
use pepo_settings::SettingError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file could not be read
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not a JSON list of settings
    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A setting value was rejected
    #[error(transparent)]
    Setting(#[from] SettingError),
}

/// Fatal errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The command table could not be built
    #[error("failed to build command table: {0}")]
    Registry(#[from] CmdError),

    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The terminal could not be read
    #[error("terminal error: {0}")]
    Terminal(#[from] ReadlineError),
}

//! Startup configuration
//!
//! Settings come from, in order of increasing precedence: a JSON settings
//! file (`--settings`, or `PEPO_SETTINGS` when the flag is absent) and
//! `--set` flags. Positional arguments are `.pep` files or directories to
//! import.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pepo_settings::{GlobalSettings, SerializedSetting};

use crate::error::ConfigError;

/// Interactive command shell with user-defined macros
#[derive(Debug, Default, Clone, PartialEq, Eq, Parser)]
#[command(name = "pepo", version)]
#[command(after_help = "Set RUST_LOG to change the log filter (default: warn).")]
pub struct Config {
    /// Override a setting (repeatable)
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub overrides: Vec<(String, String)>,

    /// Load settings from a JSON list of {"name", "value"} entries
    #[arg(long = "settings", value_name = "FILE", env = "PEPO_SETTINGS")]
    pub settings_file: Option<PathBuf>,

    /// .pep files or directories of .pep files to import at startup
    #[arg(value_name = "MACRO_PATH")]
    pub macro_paths: Vec<PathBuf>,
}

/// Parse a `--set` value into `(name, value)`; the value may itself contain `=`
fn parse_assignment(text: &str) -> Result<(String, String), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing setting name in '{}'", text));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Config {
    /// Apply every settings source to `settings`
    ///
    /// The file is applied all-or-nothing; a bad `--set` leaves earlier
    /// sources in place and stops.
    pub fn apply(&self, settings: &mut GlobalSettings) -> Result<(), ConfigError> {
        if let Some(path) = &self.settings_file {
            let list = read_settings_file(path)?;
            settings.apply_serialized(&list)?;
            log::info!("applied {} setting(s) from {}", list.len(), path.display());
        }

        for (name, value) in &self.overrides {
            settings.set_from_str(name, value)?;
            log::debug!("--set {}={}", name, value);
        }
        Ok(())
    }
}

/// Read a JSON list of `{ "name": ..., "value": ... }` entries
pub fn read_settings_file(path: &Path) -> Result<Vec<SerializedSetting>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use pepo_settings::id;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("pepo").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_paths() {
        let config = parse(&[
            "--set",
            "sound=on",
            "-s",
            "suggestion_sensitivity=5",
            "--settings=/tmp/pepo.json",
            "/macros/setup.pep",
            "/macros/more",
        ])
        .unwrap();

        assert_eq!(
            config.overrides,
            vec![
                ("sound".to_string(), "on".to_string()),
                ("suggestion_sensitivity".to_string(), "5".to_string())
            ]
        );
        assert_eq!(config.settings_file, Some(PathBuf::from("/tmp/pepo.json")));
        assert_eq!(
            config.macro_paths,
            vec![PathBuf::from("/macros/setup.pep"), PathBuf::from("/macros/more")]
        );
    }

    #[test]
    fn test_cursor_value_may_contain_equals() {
        let config = parse(&["--set=cursor=a=b"]).unwrap();
        assert_eq!(config.overrides, vec![("cursor".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&["--set"]).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(parse(&["--set", "sound"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["--set", "=on"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["--verbose"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert_eq!(parse(&["-h"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment(" sound =on"),
            Ok(("sound".to_string(), "on".to_string()))
        );
        assert!(parse_assignment("sound").is_err());
    }

    #[test]
    fn test_apply_precedence() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(
            &file,
            r#"[{"name": "suggestion_sensitivity", "value": 1}, {"name": "cursor", "value": "file> "}]"#,
        )
        .unwrap();

        let config = Config {
            settings_file: Some(file),
            overrides: vec![
                ("suggestion_sensitivity".to_string(), "2".to_string()),
                ("echo_macros".to_string(), "yes".to_string()),
            ],
            ..Config::default()
        };
        let mut settings = GlobalSettings::new();
        config.apply(&mut settings).unwrap();

        assert_eq!(settings.get_int(id::suggestion_sensitivity), 2);
        assert_eq!(settings.get_string(id::cursor), "file> ");
        assert!(settings.get_bool(id::echo_macros));
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let config = Config {
            overrides: vec![("suggestion_sensitivity".to_string(), "11".to_string())],
            ..Config::default()
        };
        let mut settings = GlobalSettings::new();
        assert!(matches!(
            config.apply(&mut settings),
            Err(ConfigError::Setting(_))
        ));
        assert_eq!(settings.get_int(id::suggestion_sensitivity), 3);
    }

    #[test]
    fn test_bad_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_settings_file(&path),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            read_settings_file(&dir.path().join("absent.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}

//! Named, user-defined macros
//!
//! A macro is an ordered list of raw action lines. Lines are stored verbatim
//! and only interpreted when the macro is played back by the dispatcher.
//! Macros live for the session unless exported to `.pep` files.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;

use crate::command::CommandRegistry;
use crate::error::{CmdError, CmdResult};

/// File extension of macro files
pub const MACRO_EXTENSION: &str = "pep";

/// Per-file outcome of a batch import
pub type ImportReport = Vec<(PathBuf, CmdResult<String>)>;

/// Per-macro outcome of an export
pub type ExportReport = Vec<(String, CmdResult<PathBuf>)>;

/// Session macro table
pub struct MacroStore {
    registry: Arc<CommandRegistry>,
    /// Macro names in definition order
    order: Vec<String>,
    macros: AHashMap<String, Vec<String>>,
}

impl MacroStore {
    /// Create an empty store that checks names against `registry`
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            order: Vec::new(),
            macros: AHashMap::new(),
        }
    }

    /// Define or replace a macro
    ///
    /// Replacing an existing macro requires `overwrite_confirmed`; without it
    /// the call fails with `ConfirmationRequired` and nothing changes.
    pub fn define(
        &mut self,
        name: &str,
        lines: Vec<String>,
        overwrite_confirmed: bool,
    ) -> CmdResult {
        if name.trim().is_empty() {
            return Err(CmdError::invalid_arg("name", "macro name cannot be empty"));
        }
        if name.starts_with('#') {
            return Err(CmdError::invalid_arg(
                name,
                "macro names cannot start with '#'",
            ));
        }
        if self.registry.is_reserved(name) {
            return Err(CmdError::ReservedName(name.to_string()));
        }

        if self.macros.contains_key(name) {
            if !overwrite_confirmed {
                return Err(CmdError::ConfirmationRequired(format!(
                    "overwrite macro '{}'",
                    name
                )));
            }
            log::debug!("replacing macro '{}'", name);
        } else {
            self.order.push(name.to_string());
        }

        self.macros.insert(name.to_string(), lines);
        Ok(())
    }

    /// Get the lines of a macro
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.macros.get(name).map(Vec::as_slice)
    }

    /// Check if a macro exists (case-sensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Macro names in definition order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Iterate over `(name, lines)` in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .filter_map(|name| self.get(name).map(|lines| (name.as_str(), lines)))
    }

    /// Number of macros
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no macros are defined
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove a macro, returning its lines
    pub fn delete(&mut self, name: &str, confirmed: bool) -> CmdResult<Vec<String>> {
        if !self.macros.contains_key(name) {
            return Err(CmdError::not_found(format!(
                "unable to find {} . macros are case-sensitive.",
                name
            )));
        }
        if !confirmed {
            return Err(CmdError::ConfirmationRequired(format!(
                "delete macro '{}'",
                name
            )));
        }

        self.order.retain(|n| n != name);
        let lines = self.macros.remove(name).unwrap_or_default();
        log::debug!("deleted macro '{}'", name);
        Ok(lines)
    }

    /// Drop every macro
    pub fn clear(&mut self) {
        self.order.clear();
        self.macros.clear();
    }

    /// Import one `.pep` file as a macro named after the file stem
    pub fn import_file(&mut self, path: &Path, force: bool) -> CmdResult<String> {
        if !path.is_absolute() {
            return Err(CmdError::path(path, "path must be absolute"));
        }
        if !path.exists() {
            return Err(CmdError::path(path, "no such file or directory"));
        }
        if path.is_dir() {
            return Err(CmdError::path(path, "expected a file, found a directory"));
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| CmdError::path(path, "file name is not valid UTF-8"))?
            .to_string();

        let content = fs::read_to_string(path)?;
        let lines: Vec<String> = content.lines().map(str::to_string).collect();

        self.define(&name, lines, force)?;
        log::info!("imported macro '{}' from {}", name, path.display());
        Ok(name)
    }

    /// List the `.pep` files directly inside a directory, sorted by path
    pub fn macro_files(dir: &Path) -> CmdResult<Vec<PathBuf>> {
        if !dir.is_absolute() {
            return Err(CmdError::path(dir, "path must be absolute"));
        }
        if !dir.is_dir() {
            return Err(CmdError::path(dir, "not a directory"));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_macro = path
                .extension()
                .is_some_and(|ext| ext == MACRO_EXTENSION);
            if is_macro && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Import every `.pep` file in a directory
    ///
    /// Each file succeeds or fails on its own; a bad file never aborts the
    /// rest of the batch.
    pub fn import_dir(&mut self, dir: &Path, force: bool) -> CmdResult<ImportReport> {
        let files = Self::macro_files(dir)?;
        let mut report = Vec::with_capacity(files.len());

        for path in files {
            let result = self.import_file(&path, force);
            if let Err(e) = &result {
                log::warn!("failed to import {}: {}", path.display(), e);
            }
            report.push((path, result));
        }

        Ok(report)
    }

    /// Write macros to `<dir>/<name>.pep`, lines joined by newlines
    ///
    /// An empty `names` selects every macro. Writing anything at all requires
    /// `confirmed`. A failed write is reported for that macro only.
    pub fn export<S: AsRef<str>>(
        &self,
        dir: &Path,
        names: &[S],
        confirmed: bool,
    ) -> CmdResult<ExportReport> {
        if !dir.is_dir() {
            return Err(CmdError::path(dir, "no such directory"));
        }

        let selected: Vec<&str> = if names.is_empty() {
            self.order.iter().map(String::as_str).collect()
        } else {
            names.iter().map(AsRef::as_ref).collect()
        };

        if !confirmed && !selected.is_empty() {
            let existing = selected
                .iter()
                .filter(|name| Self::export_path(dir, name).exists())
                .count();
            let mut action = format!("write {} macro file(s) to {}", selected.len(), dir.display());
            if existing > 0 {
                action.push_str(&format!(", overwriting {} existing file(s)", existing));
            }
            return Err(CmdError::ConfirmationRequired(action));
        }

        let mut report = Vec::with_capacity(selected.len());
        for name in selected {
            let result = self.export_one(dir, name);
            match &result {
                Ok(path) => log::info!("exported macro '{}' to {}", name, path.display()),
                Err(e) => log::warn!("failed to export macro '{}': {}", name, e),
            }
            report.push((name.to_string(), result));
        }

        Ok(report)
    }

    fn export_one(&self, dir: &Path, name: &str) -> CmdResult<PathBuf> {
        let lines = self
            .get(name)
            .ok_or_else(|| CmdError::not_found(format!("macro '{}'", name)))?;
        let path = Self::export_path(dir, name);

        match fs::write(&path, lines.join("\n")) {
            Ok(()) => Ok(path),
            Err(e) => Err(write_error(path, e)),
        }
    }

    fn export_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", name, MACRO_EXTENSION))
    }
}

/// Map a failed macro write; a denied write names the file
fn write_error(path: PathBuf, e: io::Error) -> CmdError {
    match e.kind() {
        ErrorKind::PermissionDenied => CmdError::Permission(path),
        _ => CmdError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Arity, FnCommand};
    use tempfile::TempDir;

    fn store() -> MacroStore {
        let mut registry = CommandRegistry::new();
        registry
            .register(FnCommand::new(
                &["quit", "exit", "acha"],
                "leave",
                "quit",
                Arity::NONE,
                |_, _| Ok(()),
            ))
            .unwrap();
        MacroStore::new(Arc::new(registry))
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_define_and_get() {
        let mut macros = store();
        macros.define("greet", lines(&["# hello", "quit"]), false).unwrap();
        assert_eq!(macros.get("greet").unwrap(), &["# hello", "quit"]);
        assert!(macros.get("Greet").is_none());
        assert_eq!(macros.names(), &["greet"]);
    }

    #[test]
    fn test_reserved_name_rejected() {
        let mut macros = store();
        let err = macros.define("exit", lines(&["quit"]), true).unwrap_err();
        assert!(matches!(err, CmdError::ReservedName(ref n) if n == "exit"));
        assert!(macros.is_empty());
    }

    #[test]
    fn test_overwrite_requires_confirmation() {
        let mut macros = store();
        macros.define("m", lines(&["a"]), false).unwrap();

        let err = macros.define("m", lines(&["b"]), false).unwrap_err();
        assert!(matches!(err, CmdError::ConfirmationRequired(_)));
        assert_eq!(macros.get("m").unwrap(), &["a"]);

        macros.define("m", lines(&["b"]), true).unwrap();
        assert_eq!(macros.get("m").unwrap(), &["b"]);
        assert_eq!(macros.len(), 1);
    }

    #[test]
    fn test_invalid_names() {
        let mut macros = store();
        assert!(matches!(
            macros.define("  ", vec![], true),
            Err(CmdError::InvalidArgument { .. })
        ));
        assert!(matches!(
            macros.define("#note", vec![], true),
            Err(CmdError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_delete() {
        let mut macros = store();
        macros.define("a", lines(&["x"]), false).unwrap();
        macros.define("b", lines(&["y"]), false).unwrap();

        assert!(matches!(
            macros.delete("a", false),
            Err(CmdError::ConfirmationRequired(_))
        ));
        assert_eq!(macros.delete("a", true).unwrap(), vec!["x"]);
        assert_eq!(macros.names(), &["b"]);

        let err = macros.delete("a", true).unwrap_err();
        assert!(matches!(err, CmdError::NotFound(_)));
        assert_eq!(macros.names(), &["b"]);
    }

    #[test]
    fn test_definition_order_kept() {
        let mut macros = store();
        for name in ["zeta", "alpha", "mid"] {
            macros.define(name, vec![], false).unwrap();
        }
        let names: Vec<&str> = macros.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        macros.clear();
        assert!(macros.is_empty());
    }

    #[test]
    fn test_import_relative_path_rejected() {
        let mut macros = store();
        let err = macros.import_file(Path::new("relative.pep"), true).unwrap_err();
        assert!(matches!(err, CmdError::Path { .. }));
    }

    #[test]
    fn test_import_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut macros = store();
        let err = macros
            .import_file(&dir.path().join("absent.pep"), true)
            .unwrap_err();
        assert!(matches!(err, CmdError::Path { .. }));
    }

    #[test]
    fn test_import_strips_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crlf.pep");
        fs::write(&path, "first\r\nsecond\n").unwrap();

        let mut macros = store();
        assert_eq!(macros.import_file(&path, false).unwrap(), "crlf");
        assert_eq!(macros.get("crlf").unwrap(), &["first", "second"]);
    }

    #[test]
    fn test_export_always_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut macros = store();
        macros.define("a", lines(&["x"]), false).unwrap();
        macros.define("m", lines(&["a", "b"]), false).unwrap();

        let err = macros.export(dir.path(), &[] as &[&str], false).unwrap_err();
        assert!(matches!(err, CmdError::ConfirmationRequired(ref action) if action.starts_with("write 2 macro file(s)")));
        assert!(!dir.path().join("a.pep").exists());
        assert!(!dir.path().join("m.pep").exists());

        let report = macros.export(dir.path(), &["m"], true).unwrap();
        assert!(report[0].1.is_ok());
        assert_eq!(fs::read_to_string(dir.path().join("m.pep")).unwrap(), "a\nb");

        let err = macros.export(dir.path(), &["m"], false).unwrap_err();
        assert!(matches!(err, CmdError::ConfirmationRequired(ref action) if action.contains("overwriting 1 existing file(s)")));
    }

    #[test]
    fn test_export_nothing_selected_needs_no_confirmation() {
        let dir = TempDir::new().unwrap();
        let macros = store();
        let report = macros.export(dir.path(), &[] as &[&str], false).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_write_error_mapping() {
        let path = PathBuf::from("/locked/m.pep");
        let err = write_error(path.clone(), io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, CmdError::Permission(ref p) if *p == path));
        assert_eq!(err.to_string(), "write permission to /locked/m.pep denied");

        let err = write_error(path, io::Error::from(ErrorKind::NotFound));
        assert!(matches!(err, CmdError::Io(_)));
    }

    #[test]
    fn test_export_failed_write_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the target path makes that write fail
        fs::create_dir(dir.path().join("blocked.pep")).unwrap();

        let mut macros = store();
        macros.define("blocked", lines(&["x"]), false).unwrap();
        macros.define("open", lines(&["y"]), false).unwrap();

        let report = macros.export(dir.path(), &[] as &[&str], true).unwrap();
        assert_eq!(report.len(), 2);
        assert!(matches!(report[0].1, Err(CmdError::Io(_))));
        assert!(report[1].1.is_ok());
        assert_eq!(fs::read_to_string(dir.path().join("open.pep")).unwrap(), "y");
    }

    #[test]
    fn test_export_missing_directory() {
        let dir = TempDir::new().unwrap();
        let macros = store();
        let err = macros
            .export(&dir.path().join("nope"), &[] as &[&str], true)
            .unwrap_err();
        assert!(matches!(err, CmdError::Path { .. }));
    }
}

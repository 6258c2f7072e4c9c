//! Parsed input line and argument accessors

use std::fmt;

/// Marker a user appends to grant permission up front (`delete-macro m !`)
pub const PERMISSION_MARK: &str = "!";

/// A parsed input line
///
/// `command` is the first whitespace-delimited token, lower-cased; `arguments`
/// are the remaining tokens in order with their case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// The command token, lower-cased (None for a blank line)
    pub command: Option<String>,
    /// Positional arguments
    pub arguments: Vec<String>,
}

impl ParsedLine {
    /// Create a parsed line with a command and no arguments
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            arguments: Vec::new(),
        }
    }

    /// Add a positional argument
    pub fn with_arg(mut self, value: impl Into<String>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Whether this line is a no-op (blank or a `#` comment)
    pub fn is_noop(&self) -> bool {
        match &self.command {
            None => true,
            Some(cmd) => cmd.starts_with('#'),
        }
    }
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cmd) = &self.command {
            write!(f, "{}", cmd)?;
        }
        for arg in &self.arguments {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Borrowed view over a command's positional arguments
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [String],
}

impl<'a> Args<'a> {
    /// Wrap a slice of arguments
    pub fn new(values: &'a [String]) -> Self {
        Self { values }
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All arguments
    pub fn as_slice(&self) -> &'a [String] {
        self.values
    }

    /// Get a positional argument by index (0-based)
    pub fn get_str(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).map(|s| s.as_str())
    }

    /// Get a positional argument as an integer
    pub fn get_int(&self, index: usize) -> Option<i64> {
        self.get_str(index).and_then(|s| s.parse().ok())
    }

    /// Get a positional argument as a float
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get_str(index).and_then(|s| s.parse().ok())
    }

    /// Whether the last argument is the permission mark `!`
    pub fn has_permission_mark(&self) -> bool {
        self.values.last().map(|s| s.as_str()) == Some(PERMISSION_MARK)
    }

    /// Arguments with a trailing permission mark removed
    pub fn without_permission_mark(&self) -> &'a [String] {
        if self.has_permission_mark() {
            &self.values[..self.values.len() - 1]
        } else {
            self.values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_detection() {
        assert!(ParsedLine::default().is_noop());
        assert!(ParsedLine::new("#note").is_noop());
        assert!(!ParsedLine::new("help").is_noop());
    }

    #[test]
    fn test_display() {
        let line = ParsedLine::new("export").with_arg("/tmp").with_arg("m");
        assert_eq!(line.to_string(), "export /tmp m");
    }

    #[test]
    fn test_permission_mark() {
        let values = vec!["m".to_string(), "!".to_string()];
        let args = Args::new(&values);
        assert!(args.has_permission_mark());
        assert_eq!(args.without_permission_mark(), &["m".to_string()]);

        let values = vec!["m".to_string()];
        assert!(!Args::new(&values).has_permission_mark());
    }

    #[test]
    fn test_numeric_accessors() {
        let values = vec!["2.5".to_string(), "7".to_string(), "x".to_string()];
        let args = Args::new(&values);
        assert_eq!(args.get_float(0), Some(2.5));
        assert_eq!(args.get_int(1), Some(7));
        assert_eq!(args.get_int(2), None);
        assert_eq!(args.get_str(3), None);
    }
}

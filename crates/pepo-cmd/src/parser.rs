//! Line parsing
//!
//! Input lines are split on whitespace. The first token, lower-cased, is the
//! command; the rest are arguments with their case preserved. Macro names are
//! matched against the raw text instead, so they stay case-sensitive.

use crate::args::ParsedLine;

/// Parse a single input line
///
/// # Example
/// ```
/// use pepo_cmd::parse_line;
///
/// let line = parse_line("  HELP Macros ");
/// assert_eq!(line.command.as_deref(), Some("help"));
/// assert_eq!(line.arguments, vec!["Macros".to_string()]);
/// ```
pub fn parse_line(input: &str) -> ParsedLine {
    let mut tokens = input.split_whitespace();
    ParsedLine {
        command: tokens.next().map(str::to_lowercase),
        arguments: tokens.map(str::to_string).collect(),
    }
}

/// First whitespace-delimited token of a line, case preserved
pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Whether a line is a comment (first non-blank character is `#`)
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Split a one-line macro definition into action lines
///
/// The words are re-joined with single spaces and split on `;`. Each action
/// is trimmed; empty actions are dropped. The line arrives already split on
/// whitespace, so a run of spaces inside an action is stored as one space
/// (`echo a  b` becomes `echo a b`).
///
/// # Example
/// ```
/// use pepo_cmd::split_definition;
///
/// let words: Vec<String> = "sound on; pause 1;help".split(' ').map(String::from).collect();
/// assert_eq!(split_definition(&words), vec!["sound on", "pause 1", "help"]);
/// ```
pub fn split_definition(words: &[String]) -> Vec<String> {
    words
        .join(" ")
        .split(';')
        .map(str::trim)
        .filter(|action| !action.is_empty())
        .map(str::to_string)
        .collect()
}

//! Capabilities consumed by the dispatcher
//!
//! The engine never draws to a terminal or plays sounds itself. It talks to
//! the outside world through two narrow traits:
//!
//! - [`Prompt`]: user-visible output, yes/no confirmation, free-text and
//!   multi-line input
//! - [`Feedback`]: one outcome signal per dispatched line
//!
//! [`BufferedPrompt`] and [`RecordingFeedback`] are non-interactive
//! implementations for batch front-ends and tests.

use std::collections::VecDeque;

/// Kind of an output message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Plain output
    #[default]
    Normal,
    /// Informational message
    Info,
    /// Operation succeeded
    Success,
    /// Warning message
    Warning,
    /// Error message
    Error,
    /// Macro comment line echoed during playback
    Comment,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMessage {
    /// The message text
    pub text: String,
    /// The message kind
    pub kind: OutputKind,
}

impl OutputMessage {
    /// Create a message of the given kind
    pub fn new(text: impl Into<String>, kind: OutputKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Create a plain message
    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Normal)
    }

    /// Create an informational message
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Info)
    }

    /// Create a success message
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Success)
    }

    /// Create a warning message
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Warning)
    }

    /// Create an error message
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Error)
    }

    /// Create a comment echo
    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Comment)
    }
}

/// Outcome signal emitted once per dispatched line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    /// The line ran to completion
    Success,
    /// The line failed
    Error,
    /// Nothing ran (blank line or comment)
    Neutral,
}

/// Terminal-side interaction
pub trait Prompt {
    /// Show a message to the user
    fn say(&mut self, message: OutputMessage);

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> bool;

    /// Ask for one line of free text; None on end of input
    fn ask(&mut self, question: &str) -> Option<String>;

    /// Collect a block of lines (interactive macro recording)
    fn multiline(&mut self, instructions: &str) -> Vec<String>;

    /// Clear the screen
    fn clear_screen(&mut self) {}
}

/// Outcome cue (sound, bell, flash)
pub trait Feedback {
    /// Emit one signal
    fn notify(&mut self, kind: FeedbackKind);

    /// Turn the audible part of the cue on or off
    fn set_audible(&mut self, _audible: bool) {}
}

// ============================================================================
// Non-interactive implementations
// ============================================================================

/// Prompt that answers from queued responses and buffers all output
#[derive(Debug, Default)]
pub struct BufferedPrompt {
    output: Vec<OutputMessage>,
    questions: Vec<String>,
    confirmations: VecDeque<bool>,
    default_confirm: bool,
    answers: VecDeque<String>,
    blocks: VecDeque<Vec<String>>,
    clears: usize,
}

impl BufferedPrompt {
    /// Create a prompt that declines every confirmation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prompt that grants every confirmation
    pub fn accepting() -> Self {
        Self {
            default_confirm: true,
            ..Self::default()
        }
    }

    /// Queue answers for upcoming confirmations (then fall back to the default)
    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(answers);
        self
    }

    /// Queue an answer for an upcoming `ask`
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answers.push_back(answer.into());
        self
    }

    /// Queue a block for an upcoming `multiline`
    pub fn with_block<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.blocks
            .push_back(lines.into_iter().map(Into::into).collect());
        self
    }

    /// All messages shown so far
    pub fn output(&self) -> &[OutputMessage] {
        &self.output
    }

    /// Texts of all messages shown so far
    pub fn texts(&self) -> Vec<&str> {
        self.output.iter().map(|m| m.text.as_str()).collect()
    }

    /// Drain buffered output
    pub fn take_output(&mut self) -> Vec<OutputMessage> {
        std::mem::take(&mut self.output)
    }

    /// Every question asked through `confirm` or `ask`
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// How many times the screen was cleared
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Prompt for BufferedPrompt {
    fn say(&mut self, message: OutputMessage) {
        self.output.push(message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.confirmations
            .pop_front()
            .unwrap_or(self.default_confirm)
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front()
    }

    fn multiline(&mut self, _instructions: &str) -> Vec<String> {
        self.blocks.pop_front().unwrap_or_default()
    }

    fn clear_screen(&mut self) {
        self.clears += 1;
    }
}

/// Feedback that records every signal
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    signals: Vec<FeedbackKind>,
    audible: bool,
}

impl RecordingFeedback {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals in emission order
    pub fn signals(&self) -> &[FeedbackKind] {
        &self.signals
    }

    /// Drain recorded signals
    pub fn take(&mut self) -> Vec<FeedbackKind> {
        std::mem::take(&mut self.signals)
    }

    /// Whether the last `set_audible` call turned sound on
    pub fn is_audible(&self) -> bool {
        self.audible
    }
}

impl Feedback for RecordingFeedback {
    fn notify(&mut self, kind: FeedbackKind) {
        self.signals.push(kind);
    }

    fn set_audible(&mut self, audible: bool) {
        self.audible = audible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_prompt_confirmations() {
        let mut prompt = BufferedPrompt::new().with_confirmations([true]);
        assert!(prompt.confirm("first?"));
        assert!(!prompt.confirm("second?"));
        assert_eq!(prompt.questions(), &["first?".to_string(), "second?".to_string()]);

        let mut prompt = BufferedPrompt::accepting();
        assert!(prompt.confirm("anything?"));
    }

    #[test]
    fn test_buffered_prompt_input() {
        let mut prompt = BufferedPrompt::new()
            .with_answer("7")
            .with_block(["help", "# done"]);
        assert_eq!(prompt.ask("n?"), Some("7".to_string()));
        assert_eq!(prompt.ask("n?"), None);
        assert_eq!(prompt.multiline("type"), vec!["help", "# done"]);
        assert!(prompt.multiline("type").is_empty());
    }

    #[test]
    fn test_recording_feedback() {
        let mut feedback = RecordingFeedback::new();
        feedback.notify(FeedbackKind::Neutral);
        feedback.notify(FeedbackKind::Error);
        feedback.set_audible(true);
        assert!(feedback.is_audible());
        assert_eq!(feedback.take(), vec![FeedbackKind::Neutral, FeedbackKind::Error]);
        assert!(feedback.signals().is_empty());
    }
}

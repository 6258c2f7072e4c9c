//! Terminal adapters for the dispatcher's capabilities

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use pepo_cmd::{Feedback, FeedbackKind, OutputKind, OutputMessage, Prompt};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Prompt backed by a rustyline editor
pub struct TerminalPrompt {
    editor: DefaultEditor,
}

impl TerminalPrompt {
    /// Open the terminal
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read the next command line
    ///
    /// Returns `None` on Ctrl-C or Ctrl-D.
    pub fn read_line(&mut self, cursor: &str) -> Result<Option<String>, ReadlineError> {
        match self.editor.readline(cursor) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                log::info!("EOF/interrupt received, exiting...");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn read(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Some(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
            Err(e) => {
                log::warn!("failed to read input: {}", e);
                None
            }
        }
    }
}

/// Render a message with the terminal colour for its kind
pub fn render(message: &OutputMessage) -> String {
    let text = message.text.as_str();
    match message.kind {
        OutputKind::Normal => text.to_string(),
        OutputKind::Info => text.cyan().to_string(),
        OutputKind::Success => text.green().to_string(),
        OutputKind::Warning => text.yellow().to_string(),
        OutputKind::Error => text.red().to_string(),
        OutputKind::Comment => text.dark_green().italic().to_string(),
    }
}

impl Prompt for TerminalPrompt {
    fn say(&mut self, message: OutputMessage) {
        match message.kind {
            OutputKind::Error => eprintln!("{}", render(&message)),
            _ => println!("{}", render(&message)),
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        let prompt = format!("{} (y/n) ", question);
        loop {
            let Some(answer) = self.read(&prompt) else {
                return false;
            };
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => println!("{}", "please answer y or n".yellow()),
            }
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.read(&format!("{} ", question))
    }

    fn multiline(&mut self, instructions: &str) -> Vec<String> {
        println!("{}", instructions);
        println!("{}", "(finish with an empty line)".dim());

        let mut lines = Vec::new();
        while let Some(line) = self.read("| ") {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        lines
    }

    fn clear_screen(&mut self) {
        if let Err(e) = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
            log::warn!("failed to clear screen: {}", e);
        }
    }
}

/// Feedback that rings the terminal bell on errors when sound is on
pub struct BellFeedback<W: Write = Stdout> {
    out: W,
    audible: bool,
}

impl BellFeedback<Stdout> {
    /// Ring on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BellFeedback<W> {
    /// Ring on any writer, muted until `set_audible(true)`
    pub fn new(out: W) -> Self {
        Self {
            out,
            audible: false,
        }
    }

    /// The underlying writer
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Feedback for BellFeedback<W> {
    fn notify(&mut self, kind: FeedbackKind) {
        log::debug!("feedback: {:?}", kind);
        if self.audible && kind == FeedbackKind::Error {
            let rung = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
            if let Err(e) = rung {
                log::warn!("failed to ring bell: {}", e);
            }
        }
    }

    fn set_audible(&mut self, audible: bool) {
        self.audible = audible;
    }
}

use std::ops::ControlFlow;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use super::helper::ReplHelper;

const PROMPT: &str = "esla> ";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    Vars,
    History,
    Clear,
    Help,
}

#[derive(Debug, PartialEq)]
pub enum ReadOutput {
    ControlFlow(ControlFlow<()>),
    Command(Command),
    Value(String),
}

/// Classifies one line of shell input.
pub fn parse_line(line: &str) -> ReadOutput {
    match line.trim() {
        "" => ReadOutput::ControlFlow(ControlFlow::Continue(())),
        "exit" | "quit" => ReadOutput::ControlFlow(ControlFlow::Break(())),
        "vars" => ReadOutput::Command(Command::Vars),
        "history" => ReadOutput::Command(Command::History),
        "clear" => ReadOutput::Command(Command::Clear),
        "help" => ReadOutput::Command(Command::Help),
        _ => ReadOutput::Value(line.to_string()),
    }
}

pub struct Reader {
    rl: Editor<ReplHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl Reader {
    pub fn new(
        mut rl: Editor<ReplHelper, DefaultHistory>,
        history_file: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = &history_file {
            if let Err(err) = rl.load_history(path) {
                tracing::debug!(path = %path.display(), %err, "no history loaded");
            }
        }
        Self { rl, history_file }
    }

    pub fn read(&mut self) -> ReadOutput {
        let readline = self.rl.readline(PROMPT);

        let line = match readline {
            Err(ReadlineError::Interrupted) => {
                return ReadOutput::ControlFlow(ControlFlow::Continue(())); // Clear line
            }
            Err(ReadlineError::Eof) => {
                return ReadOutput::ControlFlow(ControlFlow::Break(()));
            }
            Err(err) => {
                println!("Error: {}", err);
                return ReadOutput::ControlFlow(ControlFlow::Break(()));
            }
            Ok(line) => line,
        };

        if !line.trim().is_empty() {
            if let Err(err) = self.rl.add_history_entry(line.as_str()) {
                tracing::warn!(%err, "could not record history entry");
            }
        }

        parse_line(&line)
    }

    pub fn print_history(&self) {
        for (index, entry) in self.rl.history().iter().enumerate() {
            println!("{:4}  {}", index + 1, entry);
        }
    }

    pub fn clear_screen(&mut self) {
        if let Err(err) = self.rl.clear_screen() {
            tracing::warn!(%err, "could not clear the screen");
        }
    }

    pub fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(err) = self.rl.save_history(path) {
                tracing::warn!(path = %path.display(), %err, "could not save history");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let tests = vec![
            ("", ReadOutput::ControlFlow(ControlFlow::Continue(()))),
            ("   ", ReadOutput::ControlFlow(ControlFlow::Continue(()))),
            ("exit", ReadOutput::ControlFlow(ControlFlow::Break(()))),
            (" quit ", ReadOutput::ControlFlow(ControlFlow::Break(()))),
            ("vars", ReadOutput::Command(Command::Vars)),
            ("history", ReadOutput::Command(Command::History)),
            ("clear", ReadOutput::Command(Command::Clear)),
            ("help", ReadOutput::Command(Command::Help)),
            ("x = 1", ReadOutput::Value("x = 1".to_string())),
            ("vars = 2", ReadOutput::Value("vars = 2".to_string())),
        ];

        for (line, expected) in tests {
            assert_eq!(parse_line(line), expected, "line: {line:?}");
        }
    }
}

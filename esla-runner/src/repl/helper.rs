use std::borrow::Cow;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

const KEYWORDS: &[&str] = &[
    "function", "return", "if", "else", "while", "for", "true", "false",
];

pub const COMMANDS: &[&str] = &["exit", "quit", "vars", "history", "clear", "help"];

const FUNCTION_HINT: &str = " name(params) { ... }";

/// Completion and hints for the interactive shell.
#[derive(Default)]
pub struct ReplHelper {}

impl ReplHelper {
    pub fn new() -> Self {
        Self {}
    }

    /// Start of the word under the cursor and the words that extend it.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<&'static str>) {
        let start = line[..pos]
            .rfind(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        if word.is_empty() {
            return (pos, Vec::new());
        }

        let candidates = KEYWORDS
            .iter()
            .chain(COMMANDS)
            .copied()
            .filter(|candidate| candidate.starts_with(word))
            .collect();
        (start, candidates)
    }

    fn hint_for(&self, line: &str, pos: usize) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let hint = match line.trim_end() {
            "exit" | "quit" => " (exit the shell)",
            "vars" => " (show variables)",
            "function" => FUNCTION_HINT,
            _ => return None,
        };
        Some(hint.to_string())
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(line, pos);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        self.hint_for(line, pos)
    }
}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if hint == FUNCTION_HINT {
            Cow::Owned(format!("\x1b[1;32m{}\x1b[0m", hint))
        } else {
            Cow::Owned(format!("\x1b[35m{}\x1b[0m", hint))
        }
    }
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}

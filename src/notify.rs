// User prompts - the confirm/alert primitives the session talks through
//
// The session never decides how a question is asked. The CLI asks on the
// terminal, the TUI answers from its own key handling, tests script replies.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Notifier {
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a message; no answer expected.
    fn alert(&mut self, message: &str);
}

// ============================================================================
// CONSOLE
// ============================================================================

/// Prompts on stdout, reads answers from stdin.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "ya"),
            Err(_) => false,
        }
    }

    fn alert(&mut self, message: &str) {
        println!("{}", message);
    }
}

// ============================================================================
// SCRIPTED
// ============================================================================

/// Replies from a queue of prepared answers and records everything shown.
/// An empty queue answers "no".
#[derive(Debug, Default)]
pub struct ScriptedNotifier {
    answers: VecDeque<bool>,
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[bool]) -> Self {
        ScriptedNotifier {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn push_answer(&mut self, answer: bool) {
        self.answers.push_back(answer);
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl Notifier for ScriptedNotifier {
    fn confirm(&mut self, message: &str) -> bool {
        self.questions.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

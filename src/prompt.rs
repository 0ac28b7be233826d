//! Confirmation and alert collaborators.
//!
//! The controller never talks to a terminal directly. It asks a `Confirm`
//! before destructive actions and tells a `Notify` about validation
//! failures, so front ends and tests can plug in whatever fits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::rc::Rc;

/// Blocking yes/no question
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Blocking alert
pub trait Notify {
    fn alert(&mut self, message: &str);
}

/// Answers every question with the same value
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

/// Answers from a queue; an empty queue declines
///
/// Clones share the queue and the log of asked questions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: Rc<RefCell<VecDeque<bool>>>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.into_iter().collect())),
            asked: Rc::default(),
        }
    }

    /// Queue the answer for the next question
    pub fn push_answer(&self, answer: bool) {
        self.answers.borrow_mut().push_back(answer);
    }

    /// Questions asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

/// Collects alerts; clones share the log
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    messages: Rc<RefCell<Vec<String>>>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    /// Remove and return every collected alert
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl Notify for AlertLog {
    fn alert(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Asks on stderr and reads the answer from stdin
///
/// Declines when stdin is not a terminal, so scripted runs never hang on a
/// question nobody can answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            tracing::debug!(question = message, "stdin is not a terminal, declining");
            return false;
        }

        let mut stderr = io::stderr();
        if write!(stderr, "{message} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

impl Notify for TerminalPrompt {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "j" | "ja"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_confirm_pops_answers_then_declines() {
        let mut confirm = ScriptedConfirm::new([true]);
        assert!(confirm.confirm("first?"));
        assert!(!confirm.confirm("second?"));
        assert_eq!(confirm.asked(), vec!["first?".to_string(), "second?".to_string()]);
    }

    #[test]
    fn clones_share_state() {
        let confirm = ScriptedConfirm::default();
        let mut handle = confirm.clone();
        confirm.push_answer(true);
        assert!(handle.confirm("delete?"));

        let log = AlertLog::new();
        let mut notifier = log.clone();
        notifier.alert("Create members first.");
        assert_eq!(log.last().as_deref(), Some("Create members first."));
        assert_eq!(log.drain().len(), 1);
        assert!(log.messages().is_empty());
    }

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" Ja "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}

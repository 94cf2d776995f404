//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompting goes through the [`Prompter`] trait. [`TerminalPrompter`] talks to
//! a real terminal via `dialoguer` (and `rpassword` for masked input) and fails
//! with [`PromptError::NotInteractive`] when stdin is not a TTY, so scripted
//! runs never hang waiting for input. [`ScriptedPrompter`] replays canned
//! answers for tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Select};
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                PromptError::Cancelled
            }
            dialoguer::Error::IO(e) => PromptError::IoError(e.to_string()),
        }
    }
}

/// Something that can ask the user questions.
pub trait Prompter {
    /// Pick one of `options`; returns its index.
    fn select(&self, message: &str, options: &[&str], default: usize)
        -> Result<usize, PromptError>;

    /// Free text. An empty answer yields `default` when one is given.
    fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Yes/no question.
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;

    /// Masked input (tokens). The answer is not echoed.
    fn password(&self, message: &str) -> Result<String, PromptError>;
}

/// Prompter backed by the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn ensure_interactive(&self) -> Result<(), PromptError> {
        if std::io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(PromptError::NotInteractive)
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(
        &self,
        message: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, PromptError> {
        self.ensure_interactive()?;
        Select::new()
            .with_prompt(message)
            .items(options)
            .default(default)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.ensure_interactive()?;
        let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        self.ensure_interactive()?;
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn password(&self, message: &str) -> Result<String, PromptError> {
        self.ensure_interactive()?;
        rpassword::prompt_password(format!("{}: ", message)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::Interrupted {
                PromptError::Cancelled
            } else {
                PromptError::IoError(e.to_string())
            }
        })
    }
}

/// One canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Index for a select prompt.
    Select(usize),
    /// Text for an input or password prompt.
    Text(String),
    /// Answer for a confirm prompt.
    Confirm(bool),
    /// Accept whatever default the prompt offers.
    Default,
}

/// Prompter that replays a fixed script of answers.
///
/// Running out of answers reads as [`PromptError::Cancelled`], which makes
/// "the user gave up halfway" easy to test.
///
/// # Example
///
/// ```
/// use gitray::ui::prompts::{Answer, Prompter, ScriptedPrompter};
///
/// let prompter = ScriptedPrompter::new([Answer::Confirm(false)]);
/// assert!(!prompter.confirm("Continue?", true).unwrap());
/// assert!(prompter.confirm("Again?", true).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Messages of every prompt shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    /// Whether every scripted answer has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.answers.borrow().is_empty()
    }

    fn next(&self, message: &str) -> Result<Answer, PromptError> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or(PromptError::Cancelled)
    }

    fn mismatch(message: &str, answer: &Answer) -> PromptError {
        PromptError::IoError(format!(
            "scripted answer {:?} does not fit prompt '{}'",
            answer, message
        ))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(
        &self,
        message: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, PromptError> {
        match self.next(message)? {
            Answer::Select(index) if index < options.len() => Ok(index),
            Answer::Default => Ok(default),
            other => Err(Self::mismatch(message, &other)),
        }
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        match self.next(message)? {
            Answer::Text(text) if text.is_empty() => {
                Ok(default.map(String::from).unwrap_or_default())
            }
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(default.map(String::from).unwrap_or_default()),
            other => Err(Self::mismatch(message, &other)),
        }
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => Err(Self::mismatch(message, &other)),
        }
    }

    fn password(&self, message: &str) -> Result<String, PromptError> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(String::new()),
            other => Err(Self::mismatch(message, &other)),
        }
    }
}

//! ui::output
//!
//! Output formatting and display.
//!
//! Results go to stdout; errors and hints go to stderr so that
//! Dry-mode output stays usable in shell pipelines.

use std::fmt::Display;

use crate::forge::PullRequestRecord;

/// Print a message.
pub fn print(message: impl Display) {
    println!("{}", message);
}

/// Print an error message.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a follow-up hint after an error.
pub fn hint(message: impl Display) {
    eprintln!("hint: {}", message);
}

/// Print a success message.
pub fn success(message: impl Display) {
    println!("{}", message);
}

/// Format one pull request as a listing row.
///
/// `#12  Add logging  (@alice, open)`
pub fn pull_request_row(pr: &PullRequestRecord) -> String {
    format!("#{}  {}  (@{}, {})", pr.number, pr.title, pr.author, pr.state)
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

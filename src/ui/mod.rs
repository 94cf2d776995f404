//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts behind the [`prompts::Prompter`] trait
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All console output and prompts go through this module. Prompting is a
//! trait so that Onboard mode and first-run setup can be driven by scripted
//! answers in tests.

pub mod output;
pub mod prompts;

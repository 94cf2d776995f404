//! gitray - A command-line assistant for the pull-request lifecycle
//!
//! gitray sits on top of a local git working copy and drives pull requests on
//! GitHub: opening them, sending them to a reviewer, forwarding an existing one,
//! listing what is open, and keeping a fork in step with its upstream.
//!
//! # Architecture
//!
//! - [`cli`] - Command surface (parses args, strips `--verbose`, dispatches)
//! - [`engine`] - Workflow orchestrator: Resolving → Executing → Reporting
//! - [`core`] - Configuration store, repository identity, and intents
//! - [`git`] - Local repository inspector
//! - [`forge`] - Forge client abstraction (GitHub)
//! - [`ui`] - Prompts and console output
//!
//! # Interaction modes
//!
//! Every workflow runs in one of two modes. **Dry** mode takes its parameters
//! from command-line flags; **Onboard** mode asks for them interactively. The
//! modes differ only in how the intent is gathered. Execution is shared.

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod ui;

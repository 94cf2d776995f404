//! core
//!
//! Core domain types and state owned by gitray.
//!
//! # Modules
//!
//! - [`types`] - Repository identity and remote URL parsing
//! - [`intent`] - Pull-request and fetch intents, and how they resolve
//! - [`config`] - Configuration schema, persistence, and interactive setup
//!
//! # Design Principles
//!
//! - Values here are plain data; nothing in `core` talks to the network
//! - Intent resolution is pure so it can be checked before any forge call

pub mod config;
pub mod intent;
pub mod types;

//! forge
//!
//! Abstraction for the remote hosting service.
//!
//! # Architecture
//!
//! The `Forge` trait defines the narrow interface the workflows need. The
//! orchestrator holds an `Arc<dyn Forge>` and never sees the REST client.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation over the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use gitray::core::types::RemoteIdentity;
//! use gitray::forge::github::GitHubClient;
//! use gitray::forge::{Forge, PullRequestFilter};
//!
//! let client = GitHubClient::new(token, "https://api.github.com")?;
//! let forge = client.for_repository(&RemoteIdentity::new("octo", "gitray"));
//! let open = forge.list_pull_requests(&PullRequestFilter::default()).await?;
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;

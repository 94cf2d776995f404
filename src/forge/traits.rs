//! forge::traits
//!
//! Forge trait definition for interacting with the hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! It is deliberately narrow: the workflows only ever list, create, comment
//! on, and forward pull requests, plus ask who the token belongs to.
//!
//! Each method is a single request (listing may follow pagination). Nothing
//! is retried; failures surface with the forge's status mapped into
//! [`ForgeError`].
//!
//! # Example
//!
//! ```ignore
//! use gitray::forge::{CreatePrRequest, Forge, ForgeError};
//!
//! async fn open(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let pr = forge
//!         .create_pull_request(CreatePrRequest {
//!             head: "feature/log".to_string(),
//!             base: "main".to_string(),
//!             title: "Add logging".to_string(),
//!             body: None,
//!         })
//!         .await?;
//!     println!("Created PR #{}: {}", pr.number, pr.url);
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from forge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// The token is empty or malformed; detected before any request.
    #[error("invalid access token: {0}")]
    Authentication(String),

    /// The forge rejected the token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks permission for this repository (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested pull request, branch or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ForgeError {
    /// Whether fixing the stored token could resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ForgeError::Authentication(_) | ForgeError::Unauthorized(_) | ForgeError::Forbidden(_)
        )
    }
}

/// Request to create a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrRequest {
    /// Head branch name (the branch with changes)
    pub head: String,
    /// Base branch name (the branch to merge into)
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
}

/// Filter for listing open pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
    /// Only pull requests opened by this login
    pub author: Option<String>,
    /// Only pull requests targeting this base branch
    pub base: Option<String>,
}

impl PullRequestFilter {
    /// Whether a record passes this filter.
    pub fn matches(&self, pr: &PullRequestRecord) -> bool {
        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |a| a.eq_ignore_ascii_case(&pr.author));
        let base_ok = self.base.as_deref().map_or(true, |b| b == pr.base);
        author_ok && base_ok
    }
}

/// Pull request as read from the forge.
///
/// Never cached between runs; every invocation reads fresh records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Base branch name
    pub base: String,
    /// Head branch name
    pub head: String,
    /// Login of the user who opened it
    pub author: String,
    /// Current state
    pub state: PrState,
    /// Web URL
    pub url: String,
}

/// Pull request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Closed => write!(f, "closed"),
            PrState::Merged => write!(f, "merged"),
        }
    }
}

/// Narrow capability interface over a hosting service.
///
/// Implementations are scoped to one owner/repo pair.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Login of the user the token belongs to.
    async fn authenticated_user(&self) -> Result<String, ForgeError>;

    /// List open pull requests matching `filter`.
    async fn list_pull_requests(
        &self,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>, ForgeError>;

    /// Open a new pull request.
    async fn create_pull_request(
        &self,
        request: CreatePrRequest,
    ) -> Result<PullRequestRecord, ForgeError>;

    /// Attach a review comment to a pull request.
    async fn add_review_comment(&self, number: u64, text: &str) -> Result<(), ForgeError>;

    /// Hand a pull request to `user` for review.
    async fn forward_pull_request(&self, number: u64, user: &str) -> Result<(), ForgeError>;
}

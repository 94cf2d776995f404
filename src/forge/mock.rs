//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge stores pull requests in memory, records every call, and can
//! be told to fail a specific operation. Listing returns records in insertion
//! order rather than by number, so ordering bugs in callers show up in tests.
//!
//! # Example
//!
//! ```
//! use gitray::forge::mock::MockForge;
//! use gitray::forge::{CreatePrRequest, Forge, PrState};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_user("alice");
//!
//! let pr = forge.create_pull_request(CreatePrRequest {
//!     head: "feature/log".to_string(),
//!     base: "main".to_string(),
//!     title: "Add logging".to_string(),
//!     body: None,
//! }).await.unwrap();
//!
//! assert_eq!(pr.number, 1);
//! assert_eq!(pr.author, "alice");
//! assert_eq!(pr.state, PrState::Open);
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::traits::{
    CreatePrRequest, Forge, ForgeError, PrState, PullRequestFilter, PullRequestRecord,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug)]
struct MockForgeInner {
    /// Stored PRs, in insertion order.
    prs: Vec<PullRequestRecord>,
    /// Next PR number to assign.
    next_pr_number: u64,
    /// Login returned by `authenticated_user`.
    user: String,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
    /// Comments attached, by PR number.
    comments: Vec<(u64, String)>,
    /// Reviewers requested, by PR number.
    reviewers: Vec<(u64, String)>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    AuthenticatedUser(ForgeError),
    ListPullRequests(ForgeError),
    CreatePullRequest(ForgeError),
    AddReviewComment(ForgeError),
    ForwardPullRequest(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    AuthenticatedUser,
    ListPullRequests {
        author: Option<String>,
        base: Option<String>,
    },
    CreatePullRequest {
        head: String,
        base: String,
        title: String,
    },
    AddReviewComment {
        number: u64,
        text: String,
    },
    ForwardPullRequest {
        number: u64,
        user: String,
    },
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForge {
    /// Create a new empty mock forge. The current user is `octocat`.
    pub fn new() -> Self {
        Self::with_prs(Vec::new())
    }

    /// Create a mock forge with pre-existing PRs.
    pub fn with_prs(prs: Vec<PullRequestRecord>) -> Self {
        let max_number = prs.iter().map(|p| p.number).max().unwrap_or(0);

        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                prs,
                next_pr_number: max_number + 1,
                user: "octocat".to_string(),
                fail_on: None,
                operations: Vec::new(),
                comments: Vec::new(),
                reviewers: Vec::new(),
            })),
        }
    }

    /// Set the login the token belongs to.
    pub fn with_user(self, user: &str) -> Self {
        self.lock().user = user.to_string();
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gitray::forge::mock::{FailOn, MockForge};
    /// use gitray::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreatePullRequest(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Get all stored PRs.
    pub fn all_prs(&self) -> Vec<PullRequestRecord> {
        self.lock().prs.clone()
    }

    /// Comments attached so far, as `(number, text)`.
    pub fn comments(&self) -> Vec<(u64, String)> {
        self.lock().comments.clone()
    }

    /// Reviewers requested so far, as `(number, login)`.
    pub fn reviewers(&self) -> Vec<(u64, String)> {
        self.lock().reviewers.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        // A panicking test thread must not hide the state from the assertions
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an operation and return the configured failure, if it matches.
    fn record(&self, op: MockOperation) -> Result<MutexGuard<'_, MockForgeInner>, ForgeError> {
        let mut inner = self.lock();
        let failure = match (&inner.fail_on, &op) {
            (Some(FailOn::AuthenticatedUser(e)), MockOperation::AuthenticatedUser)
            | (Some(FailOn::ListPullRequests(e)), MockOperation::ListPullRequests { .. })
            | (Some(FailOn::CreatePullRequest(e)), MockOperation::CreatePullRequest { .. })
            | (Some(FailOn::AddReviewComment(e)), MockOperation::AddReviewComment { .. })
            | (Some(FailOn::ForwardPullRequest(e)), MockOperation::ForwardPullRequest { .. }) => {
                Some(e.clone())
            }
            _ => None,
        };
        inner.operations.push(op);
        match failure {
            Some(e) => Err(e),
            None => Ok(inner),
        }
    }

    fn ensure_exists(inner: &MockForgeInner, number: u64) -> Result<(), ForgeError> {
        if inner.prs.iter().any(|p| p.number == number) {
            Ok(())
        } else {
            Err(ForgeError::NotFound(format!("pull request #{}", number)))
        }
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn authenticated_user(&self) -> Result<String, ForgeError> {
        let inner = self.record(MockOperation::AuthenticatedUser)?;
        Ok(inner.user.clone())
    }

    async fn list_pull_requests(
        &self,
        filter: &PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>, ForgeError> {
        let inner = self.record(MockOperation::ListPullRequests {
            author: filter.author.clone(),
            base: filter.base.clone(),
        })?;
        Ok(inner
            .prs
            .iter()
            .filter(|p| p.state == PrState::Open && filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create_pull_request(
        &self,
        request: CreatePrRequest,
    ) -> Result<PullRequestRecord, ForgeError> {
        let mut inner = self.record(MockOperation::CreatePullRequest {
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
        })?;

        let duplicate = inner
            .prs
            .iter()
            .any(|p| p.state == PrState::Open && p.head == request.head && p.base == request.base);
        if duplicate {
            return Err(ForgeError::ApiError {
                status: 422,
                message: format!("A pull request already exists for {}", request.head),
            });
        }

        let number = inner.next_pr_number;
        inner.next_pr_number += 1;

        let pr = PullRequestRecord {
            number,
            title: request.title,
            base: request.base,
            head: request.head,
            author: inner.user.clone(),
            state: PrState::Open,
            url: format!("https://github.com/mock/repo/pull/{}", number),
        };
        inner.prs.push(pr.clone());
        Ok(pr)
    }

    async fn add_review_comment(&self, number: u64, text: &str) -> Result<(), ForgeError> {
        let mut inner = self.record(MockOperation::AddReviewComment {
            number,
            text: text.to_string(),
        })?;
        Self::ensure_exists(&inner, number)?;
        inner.comments.push((number, text.to_string()));
        Ok(())
    }

    async fn forward_pull_request(&self, number: u64, user: &str) -> Result<(), ForgeError> {
        let mut inner = self.record(MockOperation::ForwardPullRequest {
            number,
            user: user.to_string(),
        })?;
        Self::ensure_exists(&inner, number)?;
        inner.reviewers.push((number, user.to_string()));
        Ok(())
    }
}

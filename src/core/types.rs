//! core::types
//!
//! Repository identity derived from the origin remote.
//!
//! # Accepted remote shapes
//!
//! - `git@host:owner/repo(.git)` (scp-like SSH)
//! - `ssh://git@host[:port]/owner/repo(.git)`
//! - `https://host/owner/repo(.git)` and `http://...`
//!
//! A trailing `.git` and a trailing `/` are both ignored. Paths with more than
//! two segments are rejected since they cannot name a GitHub repository.

use std::fmt;

use serde::Serialize;

/// The owner/repo pair every forge call is scoped to.
///
/// Derived once per run from the origin remote and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteIdentity {
    /// User or organization owning the repository
    pub owner: String,
    /// Repository name, without `.git`
    pub repo: String,
}

impl RemoteIdentity {
    /// Create an identity from already-validated parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a remote URL into an identity.
    ///
    /// Returns `None` for local paths, `file://` URLs, and anything that does
    /// not end in exactly `owner/repo`.
    ///
    /// # Example
    ///
    /// ```
    /// use gitray::core::types::RemoteIdentity;
    ///
    /// let ssh = RemoteIdentity::parse_remote_url("git@github.com:octo/gitray.git");
    /// let https = RemoteIdentity::parse_remote_url("https://github.com/octo/gitray");
    /// assert_eq!(ssh, https);
    /// assert_eq!(ssh.unwrap().to_string(), "octo/gitray");
    /// ```
    pub fn parse_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();

        let schemed = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .or_else(|| url.strip_prefix("ssh://"));

        let path = match schemed {
            // host[:port] (with optional credentials) precedes the first slash
            Some(rest) => rest.split_once('/')?.1,
            None => {
                let (user_host, path) = url.split_once(':')?;
                if user_host.is_empty() || user_host.contains('/') {
                    return None;
                }
                path
            }
        };

        Self::parse_owner_repo(path)
    }

    /// Parse "owner/repo.git" or "owner/repo" into an identity.
    fn parse_owner_repo(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, repo) = path.split_once('/')?;

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        if owner.chars().any(char::is_whitespace) || repo.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RemoteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

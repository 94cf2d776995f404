//! git::interface
//!
//! Git interface implementation.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RemoteMissing`] / [`GitError::RemoteParse`]: origin cannot
//!   be turned into a repository identity
//! - [`GitError::SyncConflict`]: the branch cannot be fast-forwarded
//! - [`GitError::CommandFailed`]: a `git` subprocess exited non-zero

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::core::types::RemoteIdentity;

/// Remote the repository identity is read from.
pub const ORIGIN: &str = "origin";

/// Remote a fork is synchronised from.
pub const UPSTREAM: &str = "upstream";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("repository is bare; a working directory is required")]
    BareRepo,

    /// A required remote is not configured.
    #[error("no '{name}' remote is configured")]
    RemoteMissing { name: String },

    /// The remote URL does not name an owner/repo pair.
    #[error("cannot parse '{name}' remote URL '{url}'; expected git@host:owner/repo or https://host/owner/repo")]
    RemoteParse { name: String, url: String },

    /// HEAD does not point at a branch.
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound { refname: String },

    /// The local branch has commits the remote branch lacks.
    #[error("'{branch}' has diverged from '{upstream}' and cannot be fast-forwarded; merge or rebase it yourself")]
    SyncConflict { branch: String, upstream: String },

    /// A git subprocess failed.
    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal { message: String },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Result of a fast-forward operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to do; the branch already contains the remote tip.
    UpToDate { branch: String },
    /// The branch moved from `from` to `to` (short ids).
    FastForwarded {
        branch: String,
        from: String,
        to: String,
    },
}

/// Handle to one repository.
pub struct Git {
    repo: git2::Repository,
    work_dir: PathBuf,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("work_dir", &self.work_dir).finish()
    }
}

impl Git {
    /// Whether `path` or one of its ancestors is inside a git repository.
    ///
    /// Never fails; any detection problem reads as "no".
    pub fn is_project_using_git(path: &Path) -> bool {
        git2::Repository::discover(path).is_ok()
    }

    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        let work_dir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(Self { repo, work_dir })
    }

    /// Root of the working tree.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Get the current branch name.
    ///
    /// Returns `None` on a detached HEAD. An unborn branch (no commits yet)
    /// still has a name and is returned.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(String::from)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                // HEAD names a branch with no commits; read it symbolically
                let head = self.repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .map(String::from))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the URL of a remote, or `None` if it isn't configured.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Owner/repo identity of the origin remote.
    pub fn origin_remote(&self) -> Result<RemoteIdentity, GitError> {
        let url = self
            .remote_url(ORIGIN)?
            .ok_or_else(|| GitError::RemoteMissing {
                name: ORIGIN.to_string(),
            })?;

        RemoteIdentity::parse_remote_url(&url).ok_or(GitError::RemoteParse {
            name: ORIGIN.to_string(),
            url,
        })
    }

    /// Resolve a ref to the commit it points at.
    pub fn resolve_ref(&self, refname: &str) -> Result<git2::Oid, GitError> {
        self.try_resolve_ref(refname)?
            .ok_or_else(|| GitError::RefNotFound {
                refname: refname.to_string(),
            })
    }

    /// Resolve a ref, returning `None` if it doesn't exist.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<git2::Oid>, GitError> {
        match self.repo.find_reference(refname) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `ancestor` is reachable from `descendant`.
    ///
    /// A commit is its own ancestor.
    pub fn is_ancestor(&self, ancestor: git2::Oid, descendant: git2::Oid) -> Result<bool, GitError> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    /// Fetch `upstream` and fast-forward the current branch to it.
    ///
    /// # Errors
    ///
    /// - [`GitError::DetachedHead`] if no branch is checked out
    /// - [`GitError::RemoteMissing`] if there is no `upstream` remote
    /// - [`GitError::RefNotFound`] if upstream has no branch of the same name
    /// - [`GitError::SyncConflict`] if the branch has diverged; nothing is
    ///   changed in that case
    pub fn sync_with_upstream(&self) -> Result<SyncOutcome, GitError> {
        let branch = self.current_branch()?.ok_or(GitError::DetachedHead)?;

        if self.remote_url(UPSTREAM)?.is_none() {
            return Err(GitError::RemoteMissing {
                name: UPSTREAM.to_string(),
            });
        }

        run_git(&self.work_dir, &["fetch", UPSTREAM])?;

        let upstream_branch = format!("{}/{}", UPSTREAM, branch);
        let local = self.resolve_ref(&format!("refs/heads/{}", branch))?;
        let remote = self.resolve_ref(&format!("refs/remotes/{}", upstream_branch))?;

        // Local already contains everything upstream has
        if self.is_ancestor(remote, local)? {
            return Ok(SyncOutcome::UpToDate { branch });
        }

        if !self.is_ancestor(local, remote)? {
            return Err(GitError::SyncConflict {
                branch,
                upstream: upstream_branch,
            });
        }

        run_git(&self.work_dir, &["merge", "--ff-only", &upstream_branch])?;

        Ok(SyncOutcome::FastForwarded {
            branch,
            from: short(local),
            to: short(remote),
        })
    }

    /// Fast-forward the checkout at `dir` from its tracking branch.
    ///
    /// Used for self-update; `dir` is gitray's own checkout, not the user's
    /// repository.
    pub fn update_installation(dir: &Path) -> Result<SyncOutcome, GitError> {
        let git = Self::open(dir)?;
        let branch = git.current_branch()?.ok_or(GitError::DetachedHead)?;
        let head = format!("refs/heads/{}", branch);
        let before = git.resolve_ref(&head)?;

        run_git(&git.work_dir, &["pull", "--ff-only"])?;

        let after = git.resolve_ref(&head)?;
        if before == after {
            Ok(SyncOutcome::UpToDate { branch })
        } else {
            Ok(SyncOutcome::FastForwarded {
                branch,
                from: short(before),
                to: short(after),
            })
        }
    }
}

/// Run a git subprocess in `dir`, returning its stdout.
fn run_git(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    let command = format!("git {}", args.join(" "));
    log::debug!("$ {}", command);

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| GitError::CommandFailed {
            command: command.clone(),
            message: format!("could not run git: {}", e),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        log::debug!("{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        log::debug!("{}", stderr.trim_end());
    }

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command,
            message: stderr.trim().to_string(),
        });
    }

    Ok(stdout)
}

fn short(oid: git2::Oid) -> String {
    let full = oid.to_string();
    full[..7.min(full.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn sync_conflict_names_both_sides() {
            let err = GitError::SyncConflict {
                branch: "main".to_string(),
                upstream: "upstream/main".to_string(),
            };
            let message = err.to_string();
            assert!(message.contains("'main'"));
            assert!(message.contains("'upstream/main'"));
        }

        #[test]
        fn remote_missing_display() {
            let err = GitError::RemoteMissing {
                name: "origin".to_string(),
            };
            assert_eq!(err.to_string(), "no 'origin' remote is configured");
        }
    }

    #[test]
    fn short_oid_is_seven_chars() {
        let oid = git2::Oid::from_str("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert_eq!(short(oid), "0123456");
    }

    #[test]
    fn temp_dir_outside_repo_is_not_git() {
        let dir = tempfile::TempDir::new().unwrap();
        // The temp root itself could live inside a checkout on odd setups
        if git2::Repository::discover(dir.path()).is_err() {
            assert!(!Git::is_project_using_git(dir.path()));
            assert!(matches!(
                Git::open(dir.path()),
                Err(GitError::NotARepo { .. })
            ));
        }
    }
}

//! git
//!
//! Local repository inspector.
//!
//! # Architecture
//!
//! All repository access flows through [`Git`]. Reads (discovery, HEAD,
//! remotes, ancestry) use `git2`. Operations that talk to remotes or move the
//! working tree (`fetch`, `merge --ff-only`, `pull --ff-only`) shell out to the
//! `git` binary so they pick up the user's credentials helpers and hooks.
//!
//! # Responsibilities
//!
//! - Repository detection and opening
//! - Current branch and origin identity
//! - Fast-forward sync of a fork from its `upstream` remote
//! - Fast-forward update of gitray's own checkout
//!
//! # Invariants
//!
//! - Sync and update never merge or rebase; if a fast-forward is impossible
//!   the working copy is left untouched
//!
//! # Example
//!
//! ```ignore
//! use gitray::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let identity = git.origin_remote()?;
//! println!("{} on {:?}", identity, git.current_branch()?);
//! ```

mod interface;

pub use interface::{Git, GitError, SyncOutcome, ORIGIN, UPSTREAM};

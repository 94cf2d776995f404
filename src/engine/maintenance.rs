//! engine::maintenance
//!
//! Sync and Update: pass-throughs to the repository inspector.
//!
//! Both run git on a blocking task so the runtime is never stalled by a
//! subprocess, and both report the inspector's outcome as-is.

use std::path::{Path, PathBuf};

use crate::git::{Git, SyncOutcome};

use super::WorkflowError;

/// Environment variable pointing at gitray's own checkout.
pub const INSTALL_DIR_ENV: &str = "GITRAY_HOME";

/// Fast-forward the current branch of `work_dir` from `upstream`.
pub async fn sync(work_dir: &Path) -> Result<SyncOutcome, WorkflowError> {
    let work_dir = work_dir.to_path_buf();
    let outcome = tokio::task::spawn_blocking(move || Git::open(&work_dir)?.sync_with_upstream())
        .await
        .map_err(|e| WorkflowError::Task(e.to_string()))??;
    Ok(outcome)
}

/// Fast-forward gitray's own checkout.
///
/// Returns the checkout that was updated along with the outcome.
pub async fn update() -> Result<(PathBuf, SyncOutcome), WorkflowError> {
    let dir = install_location()?;
    log::debug!("updating installation at {}", dir.display());

    let target = dir.clone();
    let outcome = tokio::task::spawn_blocking(move || Git::update_installation(&target))
        .await
        .map_err(|e| WorkflowError::Task(e.to_string()))??;
    Ok((dir, outcome))
}

/// Where gitray's source checkout lives.
///
/// `$GITRAY_HOME` if set, otherwise the checkout containing the running
/// executable (e.g. `<checkout>/target/release/gitray`).
pub fn install_location() -> Result<PathBuf, WorkflowError> {
    if let Some(home) = std::env::var_os(INSTALL_DIR_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().unwrap_or(exe.as_path());
    find_checkout(exe_dir).ok_or_else(|| WorkflowError::InstallNotFound { path: exe.clone() })
}

/// The gitray checkout enclosing `start`, if any.
///
/// The enclosing repository only counts when its `Cargo.toml` declares this
/// package; any other working tree (a dotfiles repo holding `~/.cargo/bin`,
/// say) is never pulled.
pub fn find_checkout(start: &Path) -> Option<PathBuf> {
    let git = Git::open(start).ok()?;
    let root = git.work_dir().to_path_buf();
    if is_gitray_checkout(&root) {
        Some(root)
    } else {
        log::debug!(
            "{} is a repository but not a {} checkout",
            root.display(),
            env!("CARGO_PKG_NAME")
        );
        None
    }
}

fn is_gitray_checkout(dir: &Path) -> bool {
    let Ok(manifest) = std::fs::read_to_string(dir.join("Cargo.toml")) else {
        return false;
    };
    let Ok(manifest) = manifest.parse::<toml::Table>() else {
        return false;
    };
    manifest
        .get("package")
        .and_then(|package| package.get("name"))
        .and_then(toml::Value::as_str)
        == Some(env!("CARGO_PKG_NAME"))
}

/// Describe a sync outcome.
pub fn render_sync(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::UpToDate { branch } => {
            format!("'{}' is already up to date with upstream.", branch)
        }
        SyncOutcome::FastForwarded { branch, from, to } => {
            format!("Fast-forwarded '{}' to upstream ({}..{}).", branch, from, to)
        }
    }
}

/// Describe an update outcome.
pub fn render_update(dir: &Path, outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::UpToDate { .. } => {
            format!("gitray is already up to date ({}).", dir.display())
        }
        SyncOutcome::FastForwarded { from, to, .. } => format!(
            "Updated gitray in {} ({}..{}). Rebuild to use the new version.",
            dir.display(),
            from,
            to
        ),
    }
}

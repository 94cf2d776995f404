//! engine::report
//!
//! Best-effort report records for pull-request changes.
//!
//! After a pull request is created or forwarded, a [`ReportRecord`] is handed
//! to a [`Reporter`]. Reporting is secondary: a failure is logged as a warning
//! and the workflow still succeeds.
//!
//! The default reporter appends one JSON object per line to `reports.jsonl`
//! next to the config file, which other tools can tail or import.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::core::types::RemoteIdentity;
use crate::forge::PullRequestRecord;

/// Errors from emitting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    Encode(String),
}

/// One report entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    /// `owner/repo`
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub base: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn new(identity: &RemoteIdentity, pr: &PullRequestRecord) -> Self {
        Self {
            repository: identity.to_string(),
            number: pr.number,
            title: pr.title.clone(),
            base: pr.base.clone(),
            url: pr.url.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Consumer of report records.
pub trait Reporter: Send + Sync {
    fn emit(&self, record: &ReportRecord) -> Result<(), ReportError>;
}

/// What happened to the report for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Emitted,
    Skipped,
    /// The reporter failed; the message was already logged as a warning.
    Failed(String),
}

/// Emit a record, turning failure into a warning.
pub fn emit_best_effort(reporter: &dyn Reporter, record: &ReportRecord) -> ReportOutcome {
    match reporter.emit(record) {
        Ok(()) => {
            log::debug!("report emitted for #{}", record.number);
            ReportOutcome::Emitted
        }
        Err(e) => {
            log::warn!("report for pull request #{} was not created: {}", record.number, e);
            ReportOutcome::Failed(e.to_string())
        }
    }
}

/// Reporter appending JSON lines to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesReporter {
    path: PathBuf,
}

impl JsonLinesReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Reporter for JsonLinesReporter {
    fn emit(&self, record: &ReportRecord) -> Result<(), ReportError> {
        let line = serde_json::to_string(record).map_err(|e| ReportError::Encode(e.to_string()))?;
        let write_err = |e| ReportError::Write {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{}", line).map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::PrState;
    use tempfile::TempDir;

    fn record() -> ReportRecord {
        let pr = PullRequestRecord {
            number: 3,
            title: "Add logging".to_string(),
            base: "main".to_string(),
            head: "feature/log".to_string(),
            author: "alice".to_string(),
            state: PrState::Open,
            url: "https://github.com/octo/gitray/pull/3".to_string(),
        };
        ReportRecord::new(&RemoteIdentity::new("octo", "gitray"), &pr)
    }

    struct BrokenReporter;

    impl Reporter for BrokenReporter {
        fn emit(&self, _record: &ReportRecord) -> Result<(), ReportError> {
            Err(ReportError::Encode("boom".to_string()))
        }
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let reporter = JsonLinesReporter::new(dir.path().join("nested").join("reports.jsonl"));

        reporter.emit(&record()).unwrap();
        reporter.emit(&record()).unwrap();

        let contents = fs::read_to_string(reporter.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["repository"], "octo/gitray");
        assert_eq!(value["number"], 3);
        assert_eq!(value["title"], "Add logging");
        assert_eq!(value["base"], "main");
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be
        let reporter = JsonLinesReporter::new(dir.path());
        assert!(matches!(
            reporter.emit(&record()),
            Err(ReportError::Write { .. })
        ));
    }

    #[test]
    fn best_effort_swallows_failure() {
        assert_eq!(
            emit_best_effort(&BrokenReporter, &record()),
            ReportOutcome::Failed("failed to encode report: boom".to_string())
        );
    }
}

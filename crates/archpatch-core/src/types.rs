//! Core types for archpatch-core.
//!
//! This module defines the types shared by the patches and the runner:
//!
//! - [`PatchError`] - Error types for patch runs
//! - [`StepStatus`] - Outcome of one patch step
//! - [`StepReport`] / [`RunReport`] - What a run did, serializable for CI logs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Error types for archpatch-core operations.
///
/// A missing target file is not an error: it is reported through
/// [`StepStatus::Missing`] and the run moves on. Only conditions that make
/// the whole run meaningless end up here.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// An I/O error occurred while reading, backing up, or writing a file.
    ///
    /// Common causes include permission issues or a read-only checkout.
    #[error("I/O error on {}: {source}. Check file paths and permissions", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project root does not contain the canonical build-system file.
    #[error(
        "not a project root: {} (could not find build-system/BUILD)\n\n\
         Run from the iOS project root or pass --project-root.",
        .0.display()
    )]
    NotProjectRoot(PathBuf),

    /// JSON serialization of a run report failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Outcome of a single patch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The file was backed up and rewritten.
    Patched,
    /// The file already carries the patch's marker literal; nothing was touched.
    AlreadyPatched,
    /// Dry run: the file would have been backed up and rewritten.
    WouldPatch,
    /// The file does not exist under the project root.
    Missing,
    /// The file was rewritten but no anchor matched, so its content is unchanged.
    Unchanged,
}

impl StepStatus {
    /// Returns `false` only for [`StepStatus::Missing`].
    pub fn is_success(&self) -> bool {
        !matches!(self, StepStatus::Missing)
    }
}

/// Report for one file touched (or skipped) by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub status: StepStatus,
    /// Backup written before the file was overwritten, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

impl StepReport {
    pub fn new(path: impl Into<PathBuf>, status: StepStatus) -> Self {
        Self {
            path: path.into(),
            status,
            backup: None,
        }
    }

    pub fn with_backup(mut self, backup: PathBuf) -> Self {
        self.backup = Some(backup);
        self
    }
}

/// Full record of a run.
///
/// `success` folds the fixed file steps only; the genrule pass is reported
/// but never fails a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub steps: Vec<StepReport>,
    /// `None` when the genrule pass was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genrules: Option<Vec<StepReport>>,
    pub success: bool,
}

impl RunReport {
    /// Number of genrule files that were (or, in a dry run, would be) patched.
    pub fn genrules_patched(&self) -> usize {
        self.genrules
            .iter()
            .flatten()
            .filter(|step| matches!(step.status, StepStatus::Patched | StepStatus::WouldPatch))
            .count()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PatchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_fails() {
        assert!(StepStatus::Patched.is_success());
        assert!(StepStatus::AlreadyPatched.is_success());
        assert!(StepStatus::WouldPatch.is_success());
        assert!(StepStatus::Unchanged.is_success());
        assert!(!StepStatus::Missing.is_success());
    }

    #[test]
    fn test_genrules_patched_counts_dry_run_too() {
        let report = RunReport {
            dry_run: true,
            steps: vec![],
            genrules: Some(vec![
                StepReport::new("third-party/opus/BUILD", StepStatus::WouldPatch),
                StepReport::new("third-party/td/BUILD", StepStatus::AlreadyPatched),
                StepReport::new("third-party/webp/BUILD", StepStatus::Patched),
            ]),
            success: true,
        };
        assert_eq!(report.genrules_patched(), 2);
    }

    #[test]
    fn test_report_json_uses_snake_case_status() {
        let report = RunReport {
            dry_run: false,
            steps: vec![StepReport::new("build-system/BUILD", StepStatus::AlreadyPatched)],
            genrules: None,
            success: true,
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"already_patched\""));
        assert!(!json.contains("genrules"));
        assert!(!json.contains("backup"));
    }
}

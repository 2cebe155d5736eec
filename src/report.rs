//! # Report Module
//!
//! Per-file results of a batch run and the summary derived from them.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::HeaderError;

/// Information about a processed file.
#[derive(Debug)]
pub struct FileReport {
  /// Path to the target file
  pub path: PathBuf,
  /// What happened to the file
  pub action: FileAction,
}

/// Possible results for a target file
#[derive(Debug)]
pub enum FileAction {
  /// A header block was written to the file
  Added,
  /// Dry run: a header block would have been written
  WouldAdd,
  /// The file could not be processed
  Failed(HeaderError),
}

impl FileReport {
  pub const fn new(path: PathBuf, action: FileAction) -> Self {
    Self { path, action }
  }

  pub const fn is_failure(&self) -> bool {
    matches!(self.action, FileAction::Failed(_))
  }
}

/// Summary counts for a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingSummary {
  /// Files that received a header
  pub files_added: usize,
  /// Files that would receive a header (dry run)
  pub files_planned: usize,
  /// Files that failed
  pub files_failed: usize,
  /// Files never attempted because the run stopped early
  pub files_skipped: usize,
  /// Time taken for the run
  pub processing_time: Duration,
}

impl ProcessingSummary {
  /// Builds the summary for `requested` targets from the reports produced.
  pub fn from_reports(reports: &[FileReport], requested: usize, processing_time: Duration) -> Self {
    let mut summary = Self {
      processing_time,
      files_skipped: requested.saturating_sub(reports.len()),
      ..Self::default()
    };

    for report in reports {
      match report.action {
        FileAction::Added => summary.files_added += 1,
        FileAction::WouldAdd => summary.files_planned += 1,
        FileAction::Failed(_) => summary.files_failed += 1,
      }
    }

    summary
  }

  pub const fn has_failures(&self) -> bool {
    self.files_failed > 0
  }
}

//! # Output Module
//!
//! User-facing terminal output for the stdheader binary: per-file results
//! and the final summary. Failures always go to stderr, even in quiet mode.

use std::error::Error as _;
use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::info_log;
use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Header added
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Dry run
  pub const PLANNED: &str = "~";
}

/// Print the initial "Adding headers to N files..." message.
pub fn print_start_message(file_count: usize, dry_run: bool) {
  let verb = if dry_run { "Planning headers for" } else { "Adding headers to" };
  let files_word = if file_count == 1 { "file" } else { "files" };

  info_log!("{} {} {}...", verb, file_count, files_word);
}

/// Print one line per file.
///
/// Successful files are listed on stdout; failures are listed on stderr
/// together with their cause chain.
pub fn print_file_reports(reports: &[FileReport]) {
  for report in reports {
    match &report.action {
      FileAction::Added => print_success(symbols::SUCCESS, &report.path, "header added"),
      FileAction::WouldAdd => print_success(symbols::PLANNED, &report.path, "would add header"),
      FileAction::Failed(err) => {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
          message.push_str(": ");
          message.push_str(&cause.to_string());
          source = cause.source();
        }

        eprintln!(
          "{} {}: {}",
          symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
          report.path.display(),
          message
        );
      }
    }
  }
}

fn print_success(symbol: &str, path: &Path, what: &str) {
  if is_quiet() {
    return;
  }

  println!(
    "{} {} ({})",
    symbol.if_supports_color(Stream::Stdout, |s| s.green()),
    path.display(),
    what
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X added, Y failed" (plus skipped and planned counts when
/// non-zero). In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let failed_str = if summary.files_failed > 0 {
    summary
      .files_failed
      .if_supports_color(Stream::Stdout, |s| s.red())
      .to_string()
  } else {
    summary
      .files_failed
      .if_supports_color(Stream::Stdout, |s| s.cyan())
      .to_string()
  };

  let mut summary_line = format!(
    "Summary: {} added, {} failed",
    summary.files_added.if_supports_color(Stream::Stdout, |s| s.cyan()),
    failed_str
  );

  if summary.files_planned > 0 {
    summary_line.push_str(&format!(", {} planned", summary.files_planned));
  }
  if summary.files_skipped > 0 {
    summary_line.push_str(&format!(
      ", {} skipped",
      summary.files_skipped.if_supports_color(Stream::Stdout, |s| s.dimmed())
    ));
  }

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

//! # Processor Module
//!
//! This module contains [`HeaderComposer`], which formats header text with a
//! [`CommentTemplate`] and writes the resulting block to the top of target
//! files.
//!
//! - [`file_io`] - File reading and atomic rewriting
//!
//! A composer holds one immutable template for its lifetime. Header text and
//! target content are read fresh on every call, so a composer can be reused
//! across any number of files. Calls on different files are independent;
//! calls on the same file must not overlap.
//!
//! Adding a header is not idempotent: running it twice on a file stacks two
//! header blocks.

mod file_io;

use std::fs::Permissions;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use file_io::FileIO;
use tracing::{debug, info, warn};

use crate::error::HeaderError;
use crate::report::{FileAction, FileReport};
use crate::templates::{CommentTemplate, HeaderText, Language};
use crate::verbose_log;

/// The content a target file has now and the content it would have with the
/// header block in front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
  /// The current bytes of the target
  pub original: Vec<u8>,
  /// The header block followed by the original bytes
  pub updated: Vec<u8>,
  /// Permissions of the target when it was read, reapplied on rewrite
  pub permissions: Permissions,
}

impl Plan {
  /// Length in bytes of the header block at the start of `updated`.
  pub fn block_len(&self) -> usize {
    self.updated.len() - self.original.len()
  }
}

/// Formats header text as a comment block and prepends it to files.
#[derive(Debug, Clone)]
pub struct HeaderComposer {
  template: CommentTemplate,
}

impl From<CommentTemplate> for HeaderComposer {
  fn from(template: CommentTemplate) -> Self {
    Self::new(template)
  }
}

impl From<Language> for HeaderComposer {
  fn from(language: Language) -> Self {
    Self::new(language.template())
  }
}

impl HeaderComposer {
  pub const fn new(template: CommentTemplate) -> Self {
    Self { template }
  }

  /// Creates a composer from a template file (properties, or TOML when the
  /// file ends in `.toml`).
  ///
  /// # Errors
  ///
  /// Returns a configuration error if the template cannot be read, parsed,
  /// or lacks any of its three settings.
  pub fn from_template_file(path: &Path) -> Result<Self, HeaderError> {
    CommentTemplate::load(path).map(Self::new)
  }

  /// Creates a composer from literal properties text.
  ///
  /// # Errors
  ///
  /// Returns a configuration error if the text cannot be parsed or lacks any
  /// of its three settings.
  pub fn from_template_str(text: &str) -> Result<Self, HeaderError> {
    CommentTemplate::from_properties_str(text).map(Self::new)
  }

  pub const fn template(&self) -> &CommentTemplate {
    &self.template
  }

  /// Formats header lines as a comment block.
  ///
  /// The block has `lines.len() + 2` lines: the block start, each header line
  /// behind the line prefix, and the block end.
  pub fn compose_header<I, S>(&self, lines: I) -> String
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.template.compose(lines)
  }

  /// Computes the new content of `target` without writing anything.
  ///
  /// # Errors
  ///
  /// Returns an I/O error if the header or the target cannot be read.
  pub fn plan(&self, header: &Path, target: &Path) -> Result<Plan, HeaderError> {
    let header_text = HeaderText::load(header)?;
    let (original, permissions) = FileIO::read_full_content(target)?;

    let block = self.compose_header(header_text.lines());
    debug!(
      file = %target.display(),
      header_lines = header_text.len(),
      block_bytes = block.len(),
      "composed header block"
    );

    let mut updated = Vec::with_capacity(block.len() + original.len());
    updated.extend_from_slice(block.as_bytes());
    updated.extend_from_slice(&original);

    Ok(Plan {
      original,
      updated,
      permissions,
    })
  }

  /// Prepends the header read from `header` to the file at `target`.
  ///
  /// On success the target starts with exactly one header block followed by
  /// its previous content, byte for byte. A symlinked target is followed
  /// and the file it points to is rewritten. The rewrite goes through a
  /// temporary file, so a failure leaves the previous content in place.
  ///
  /// # Errors
  ///
  /// Returns an I/O error if the header or target cannot be read, or the
  /// target cannot be written.
  pub fn add_header(&self, header: &Path, target: &Path) -> Result<(), HeaderError> {
    verbose_log!("Adding header to: {}", target.display());

    let plan = self.plan(header, target)?;
    FileIO::write_file(target, &plan.updated, plan.permissions)?;

    info!(file = %target.display(), "header added");
    Ok(())
  }

  /// Adds the header to every target in order, one [`FileReport`] per file
  /// attempted.
  ///
  /// A failing file is reported and the run moves on to the next target,
  /// unless `fail_fast` is set, in which case the run stops after the first
  /// failure.
  pub fn add_header_to_all(&self, header: &Path, targets: &[PathBuf], fail_fast: bool) -> Vec<FileReport> {
    self.run_all(targets, fail_fast, |target| {
      self.add_header(header, target).map(|()| FileAction::Added)
    })
  }

  /// Like [`add_header_to_all`](Self::add_header_to_all), but only computes
  /// the new content of each target. `inspect` receives every successful
  /// plan, e.g. to show a diff.
  pub fn plan_all<F>(&self, header: &Path, targets: &[PathBuf], fail_fast: bool, mut inspect: F) -> Vec<FileReport>
  where
    F: FnMut(&Path, &Plan),
  {
    self.run_all(targets, fail_fast, |target| {
      let plan = self.plan(header, target)?;
      inspect(target, &plan);
      Ok(FileAction::WouldAdd)
    })
  }

  fn run_all<F>(&self, targets: &[PathBuf], fail_fast: bool, mut step: F) -> Vec<FileReport>
  where
    F: FnMut(&Path) -> Result<FileAction, HeaderError>,
  {
    let start = Instant::now();
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
      let action = match step(target.as_path()) {
        Ok(action) => action,
        Err(e) => {
          warn!(file = %target.display(), error = %e, "failed to process file");
          FileAction::Failed(e)
        }
      };

      let failed = matches!(action, FileAction::Failed(_));
      reports.push(FileReport::new(target.clone(), action));

      if failed && fail_fast {
        debug!(remaining = targets.len() - reports.len(), "stopping after first failure");
        break;
      }
    }

    debug!(files = reports.len(), elapsed = ?start.elapsed(), "batch finished");
    reports
  }
}

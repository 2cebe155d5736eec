//! # Error Module
//!
//! Every failure leaving the library is a [`HeaderError`]. Callers are
//! expected to branch on [`HeaderError::kind`] only; the underlying cause is
//! kept as the error source for diagnostics.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The two ways a header operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The comment template could not be read, parsed or is incomplete.
  Configuration,
  /// The header source or the target file could not be read, or the target
  /// could not be written.
  Io,
}

/// Error returned by template construction and header operations.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
  /// The template is unusable.
  #[error("Invalid comment template ({origin})")]
  Configuration {
    /// Where the template text came from: a path, or `<inline>`.
    origin: String,
    source: ConfigError,
  },

  /// Reading or writing a file failed.
  #[error("I/O failure on '{path}'")]
  Io { path: PathBuf, source: std::io::Error },
}

impl HeaderError {
  pub(crate) fn configuration(origin: impl Into<String>, source: ConfigError) -> Self {
    Self::Configuration {
      origin: origin.into(),
      source,
    }
  }

  pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }

  /// The failure category.
  pub const fn kind(&self) -> FailureKind {
    match self {
      HeaderError::Configuration { .. } => FailureKind::Configuration,
      HeaderError::Io { .. } => FailureKind::Io,
    }
  }

  /// The file the failure relates to, when there is one.
  pub fn path(&self) -> Option<&Path> {
    match self {
      HeaderError::Configuration { .. } => None,
      HeaderError::Io { path, .. } => Some(path),
    }
  }
}

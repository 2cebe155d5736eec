//! # File I/O Module
//!
//! Reading and writing utilities for the header composer. Every failure is
//! mapped to [`HeaderError::Io`] carrying the path involved.

use std::fs::{File, Permissions};
use std::io::{Read as _, Write as _};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::HeaderError;

/// File I/O operations for the composer.
pub struct FileIO;

impl FileIO {
  /// Reads the complete content of a file as raw bytes, along with the
  /// permissions of the file (of the file a symlink points to, for links).
  pub fn read_full_content(path: &Path) -> Result<(Vec<u8>, Permissions), HeaderError> {
    let mut file = File::open(path).map_err(|e| HeaderError::io(path, e))?;
    let permissions = file.metadata().map_err(|e| HeaderError::io(path, e))?.permissions();

    let mut content = Vec::new();
    file.read_to_end(&mut content).map_err(|e| HeaderError::io(path, e))?;

    Ok((content, permissions))
  }

  /// Replaces the content of the file at `path` with `content`.
  ///
  /// Symlinks are resolved first, so the file a link points to is rewritten
  /// and the link itself stays in place. The bytes are written to a temporary
  /// file next to the resolved file, given `permissions`, and renamed over
  /// it. If anything fails before the rename the file is left untouched and
  /// the temporary file is removed.
  pub fn write_file(path: &Path, content: &[u8], permissions: Permissions) -> Result<(), HeaderError> {
    let resolved = std::fs::canonicalize(path).map_err(|e| HeaderError::io(path, e))?;
    let dir = resolved.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| HeaderError::io(dir, e))?;
    trace!(staged = %staged.path().display(), file = %resolved.display(), "staging rewrite");

    staged.write_all(content).map_err(|e| HeaderError::io(path, e))?;
    staged.as_file().sync_all().map_err(|e| HeaderError::io(path, e))?;
    std::fs::set_permissions(staged.path(), permissions).map_err(|e| HeaderError::io(path, e))?;

    staged.persist(&resolved).map_err(|e| HeaderError::io(path, e.error))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_write_file_replaces_content() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("main.c");
    std::fs::write(&path, "old").expect("seed file");

    let (original, permissions) = FileIO::read_full_content(&path).expect("read");
    assert_eq!(original, b"old");

    FileIO::write_file(&path, b"new content", permissions).expect("write");

    let (content, _) = FileIO::read_full_content(&path).expect("read");
    assert_eq!(content, b"new content");
    // No staging files left behind
    assert_eq!(std::fs::read_dir(temp_dir.path()).expect("list").count(), 1);
  }

  #[cfg(unix)]
  #[test]
  fn test_write_file_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("run.sh");
    std::fs::write(&path, "echo hi\n").expect("seed file");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let (_, permissions) = FileIO::read_full_content(&path).expect("read");
    FileIO::write_file(&path, b"# header\necho hi\n", permissions).expect("write");

    let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
  }

  #[cfg(unix)]
  #[test]
  fn test_write_file_through_symlink_updates_link_target() {
    let temp_dir = TempDir::new().expect("temp dir");
    let real = temp_dir.path().join("real.c");
    let link = temp_dir.path().join("link.c");
    std::fs::write(&real, "int x;\n").expect("seed file");
    std::os::unix::fs::symlink(&real, &link).expect("symlink");

    let (_, permissions) = FileIO::read_full_content(&link).expect("read");
    FileIO::write_file(&link, b"/* h */\nint x;\n", permissions).expect("write");

    let link_meta = std::fs::symlink_metadata(&link).expect("link metadata");
    assert!(link_meta.file_type().is_symlink());
    assert_eq!(std::fs::read_link(&link).expect("read link"), real);
    assert_eq!(std::fs::read_to_string(&real).expect("read real"), "/* h */\nint x;\n");
  }

  #[test]
  fn test_write_file_missing_target() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("absent.c");
    let permissions = std::fs::metadata(temp_dir.path()).expect("metadata").permissions();

    let err = FileIO::write_file(&path, b"x", permissions).expect_err("should fail");
    assert_eq!(err.path(), Some(path.as_path()));
    assert!(!path.exists());
  }
}

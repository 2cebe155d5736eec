//! # Configuration Module
//!
//! This module parses comment template definitions. Two formats are accepted:
//!
//! - A properties dialect (`key=value`, `key: value` or `key value`), which is
//!   the native format for template files such as `java.header.properties`.
//! - TOML, for template files ending in `.toml`.
//!
//! Both formats use the same three settings. In properties files they are
//! spelled `header.start`, `line.starts` and `header.end`; in TOML files they
//! are spelled `header-start`, `line-starts` and `header-end`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::trace;

use crate::verbose_log;

/// Properties key holding the line that opens the comment block.
pub const HEADER_START_KEY: &str = "header.start";

/// Properties key holding the prefix written before every header line.
pub const LINE_STARTS_KEY: &str = "line.starts";

/// Properties key holding the line that closes the comment block.
pub const HEADER_END_KEY: &str = "header.end";

/// Error type for template configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The template file could not be read.
  #[error("Failed to read template file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// A `\uXXXX` escape in properties text is not four hex digits.
  #[error("Malformed \\uxxxx escape on line {line}: {message}")]
  MalformedEscape { line: usize, message: String },

  /// The TOML template is not valid TOML.
  #[error("Failed to parse TOML template: {source}")]
  TomlParse {
    #[from]
    source: toml::de::Error,
  },

  /// A required template setting is absent.
  #[error("Missing required template key '{key}'")]
  MissingKey { key: &'static str },
}

/// Key/value pairs read from properties text.
///
/// When a key appears more than once the last assignment wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Properties {
  entries: HashMap<String, String>,
}

impl Properties {
  /// Returns the value assigned to `key`, if any.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// The three template settings as read from a configuration source.
///
/// Every field is optional at this stage so that a missing setting can be
/// reported by name from [`TemplateConfig::require`].
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateConfig {
  /// Text emitted once, opening the block (e.g. "/*").
  pub header_start: Option<String>,

  /// Text prepended to every header line (e.g. " * ").
  pub line_starts: Option<String>,

  /// Text emitted once, closing the block (e.g. " */").
  pub header_end: Option<String>,
}

impl TemplateConfig {
  /// Builds a template configuration from properties text.
  ///
  /// Keys other than `header.start`, `line.starts` and `header.end` are
  /// ignored.
  pub fn from_properties_str(text: &str) -> Result<Self, ConfigError> {
    let props = parse_properties(text)?;
    trace!(entries = props.len(), "parsed template properties");

    Ok(Self {
      header_start: props.get(HEADER_START_KEY).map(str::to_string),
      line_starts: props.get(LINE_STARTS_KEY).map(str::to_string),
      header_end: props.get(HEADER_END_KEY).map(str::to_string),
    })
  }

  /// Builds a template configuration from TOML text.
  pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(text)?)
  }

  /// Reads a template configuration file, choosing the format from the
  /// file extension of the template itself (`.toml` or properties).
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading template from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let is_toml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
      Self::from_toml_str(&content)
    } else {
      Self::from_properties_str(&content)
    }
  }

  /// Returns the three settings, or the name of the first missing one.
  pub fn require(self) -> Result<(String, String, String), ConfigError> {
    let start = self.header_start.ok_or(ConfigError::MissingKey { key: HEADER_START_KEY })?;
    let prefix = self.line_starts.ok_or(ConfigError::MissingKey { key: LINE_STARTS_KEY })?;
    let end = self.header_end.ok_or(ConfigError::MissingKey { key: HEADER_END_KEY })?;
    Ok((start, prefix, end))
  }
}

const fn is_blank(c: char) -> bool {
  matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Parses properties text into key/value pairs.
///
/// The dialect follows the usual properties rules:
/// - blank lines and lines starting with `#` or `!` are skipped
/// - the key ends at the first unescaped `=`, `:` or whitespace
/// - whitespace around the separator is skipped, the rest of the line is the
///   value (trailing whitespace included)
/// - a line ending in an odd number of backslashes continues on the next line
/// - `\t`, `\n`, `\r`, `\f`, `\uXXXX` are escapes; any other escaped character
///   stands for itself, so `\ ` keeps a significant leading space
pub fn parse_properties(text: &str) -> Result<Properties, ConfigError> {
  let mut props = Properties::default();

  for (line_no, logical) in logical_lines(text) {
    let (raw_key, raw_value) = split_key_value(&logical);
    let key = unescape(raw_key, line_no)?;
    let value = unescape(raw_value, line_no)?;
    props.entries.insert(key, value);
  }

  Ok(props)
}

/// Joins continued lines and drops comments, yielding each logical line with
/// the 1-based number of the natural line it starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
  let normalized = text.replace("\r\n", "\n");
  let mut lines = Vec::new();
  let mut pending: Option<(usize, String)> = None;

  for (idx, natural) in normalized.split(['\n', '\r']).enumerate() {
    let stripped = natural.trim_start_matches(is_blank);

    if pending.is_none() && (stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with('!')) {
      continue;
    }

    let trailing_backslashes = stripped.chars().rev().take_while(|&c| c == '\\').count();
    let continues = trailing_backslashes % 2 == 1;
    let body = if continues { &stripped[..stripped.len() - 1] } else { stripped };

    let (start, mut joined) = pending.take().unwrap_or((idx + 1, String::new()));
    joined.push_str(body);

    if continues {
      pending = Some((start, joined));
    } else {
      lines.push((start, joined));
    }
  }

  // A continuation on the last line simply ends the entry
  if let Some(entry) = pending {
    lines.push(entry);
  }

  lines
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_key_value(line: &str) -> (&str, &str) {
  let mut escaped = false;
  let mut key_end = line.len();

  for (idx, c) in line.char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    if c == '\\' {
      escaped = true;
    } else if c == '=' || c == ':' || is_blank(c) {
      key_end = idx;
      break;
    }
  }

  let key = &line[..key_end];
  let mut rest = line[key_end..].trim_start_matches(is_blank);
  if let Some(after) = rest.strip_prefix(['=', ':']) {
    rest = after.trim_start_matches(is_blank);
  }

  (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, ConfigError> {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();

  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }

    match chars.next() {
      Some('t') => out.push('\t'),
      Some('n') => out.push('\n'),
      Some('r') => out.push('\r'),
      Some('f') => out.push('\u{000C}'),
      Some('u') => {
        let hex: String = chars.by_ref().take(4).collect();
        if hex.len() != 4 {
          return Err(ConfigError::MalformedEscape {
            line,
            message: format!("expected 4 hex digits, found '{hex}'"),
          });
        }
        let decoded = u32::from_str_radix(&hex, 16)
          .ok()
          .and_then(char::from_u32)
          .ok_or_else(|| ConfigError::MalformedEscape {
            line,
            message: format!("'{hex}' is not a valid character code"),
          })?;
        out.push(decoded);
      }
      Some(other) => out.push(other),
      None => {}
    }
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_separators() {
    let props = parse_properties("a=1\nb: 2\nc 3\nd\t=\t4\n").expect("valid properties");

    assert_eq!(props.get("a"), Some("1"));
    assert_eq!(props.get("b"), Some("2"));
    assert_eq!(props.get("c"), Some("3"));
    assert_eq!(props.get("d"), Some("4"));
  }

  #[test]
  fn test_parse_skips_comments_and_blank_lines() {
    let text = "# comment\n! also a comment\n\n   \nkey=value\n";
    let props = parse_properties(text).expect("valid properties");

    assert_eq!(props.len(), 1);
    assert_eq!(props.get("key"), Some("value"));
  }

  #[test]
  fn test_parse_comments_only_is_empty() {
    let props = parse_properties("# header.start=/*\n! line.starts=*\n\n").expect("valid properties");

    assert!(props.is_empty());
    assert_eq!(props.get("header.start"), None);
  }

  #[test]
  fn test_parse_keeps_trailing_whitespace() {
    let props = parse_properties("line.starts=// \n").expect("valid properties");
    assert_eq!(props.get("line.starts"), Some("// "));
  }

  #[test]
  fn test_parse_escaped_leading_space() {
    let props = parse_properties("line.starts=\\ * \nheader.end=\\ */").expect("valid properties");

    assert_eq!(props.get("line.starts"), Some(" * "));
    assert_eq!(props.get("header.end"), Some(" */"));
  }

  #[test]
  fn test_parse_leading_space_is_skipped_without_escape() {
    let props = parse_properties("line.starts= * ").expect("valid properties");
    assert_eq!(props.get("line.starts"), Some("* "));
  }

  #[test]
  fn test_parse_unicode_escape() {
    let props = parse_properties("line.starts=\\u0020*\\u0020").expect("valid properties");
    assert_eq!(props.get("line.starts"), Some(" * "));
  }

  #[test]
  fn test_parse_malformed_unicode_escape() {
    let err = parse_properties("ok=1\nbad=\\u12").expect_err("should fail");
    assert!(matches!(err, ConfigError::MalformedEscape { line: 2, .. }));

    let err = parse_properties("bad=\\uZZZZ").expect_err("should fail");
    assert!(matches!(err, ConfigError::MalformedEscape { line: 1, .. }));
  }

  #[test]
  fn test_parse_line_continuation() {
    let text = "header.start=/*\\\n    *\nnext=1\n";
    let props = parse_properties(text).expect("valid properties");

    assert_eq!(props.get("header.start"), Some("/**"));
    assert_eq!(props.get("next"), Some("1"));
  }

  #[test]
  fn test_parse_even_backslashes_do_not_continue() {
    let props = parse_properties("path=C:\\\\\nother=2").expect("valid properties");

    assert_eq!(props.get("path"), Some("C:\\"));
    assert_eq!(props.get("other"), Some("2"));
  }

  #[test]
  fn test_parse_escaped_separator_in_key() {
    let props = parse_properties("a\\=b=c").expect("valid properties");
    assert_eq!(props.get("a=b"), Some("c"));
  }

  #[test]
  fn test_parse_key_without_value() {
    let props = parse_properties("header.end").expect("valid properties");
    assert_eq!(props.get("header.end"), Some(""));
  }

  #[test]
  fn test_parse_crlf_and_last_assignment_wins() {
    let props = parse_properties("k=1\r\nk=2\r\n").expect("valid properties");
    assert_eq!(props.get("k"), Some("2"));
  }

  #[test]
  fn test_template_config_ignores_unknown_keys() {
    let config = TemplateConfig::from_properties_str("header.start=#\nline.starts=# \nheader.end=#\nauthor=me\n")
      .expect("valid template");

    assert_eq!(config.header_start.as_deref(), Some("#"));
    assert_eq!(config.line_starts.as_deref(), Some("# "));
    assert_eq!(config.header_end.as_deref(), Some("#"));
  }

  #[test]
  fn test_require_reports_missing_key() {
    let config = TemplateConfig::from_properties_str("header.start=/*\nheader.end=\\ */").expect("valid template");
    let err = config.require().expect_err("should fail");

    assert!(matches!(err, ConfigError::MissingKey { key: LINE_STARTS_KEY }));
  }

  #[test]
  fn test_parse_toml_template() {
    let text = concat!(
      "header-start = \"/*\"\n",
      "line-starts = \" * \"\n",
      "header-end = \" */\"\n",
    );
    let (start, prefix, end) = TemplateConfig::from_toml_str(text)
      .expect("valid toml")
      .require()
      .expect("complete template");

    assert_eq!(start, "/*");
    assert_eq!(prefix, " * ");
    assert_eq!(end, " */");
  }

  #[test]
  fn test_parse_invalid_toml() {
    let err = TemplateConfig::from_toml_str("header-start = ").expect_err("should fail");
    assert!(matches!(err, ConfigError::TomlParse { .. }));
  }

  #[test]
  fn test_load_dispatches_on_extension() {
    let temp_dir = TempDir::new().expect("temp dir");

    let toml_path = temp_dir.path().join("c.header.toml");
    std::fs::write(&toml_path, "header-start = \"/*\"\nline-starts = \" * \"\nheader-end = \" */\"\n")
      .expect("write toml");
    let config = TemplateConfig::load(&toml_path).expect("load toml");
    assert_eq!(config.line_starts.as_deref(), Some(" * "));

    let props_path = temp_dir.path().join("bash.header.properties");
    std::fs::write(&props_path, "header.start=#\nline.starts=# \nheader.end=#\n").expect("write properties");
    let config = TemplateConfig::load(&props_path).expect("load properties");
    assert_eq!(config.line_starts.as_deref(), Some("# "));
  }

  #[test]
  fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let err = TemplateConfig::load(&temp_dir.path().join("missing.properties")).expect_err("should fail");

    assert!(matches!(err, ConfigError::ReadError { .. }));
  }
}

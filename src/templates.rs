//! # Templates Module
//!
//! This module defines [`CommentTemplate`], the comment syntax used to wrap a
//! header, and [`HeaderText`], the header lines themselves.
//!
//! A template is three strings: the line that opens the comment block, the
//! prefix written before every header line, and the line that closes the
//! block. Templates are loaded from a properties or TOML file, parsed from a
//! literal string, or taken from the built-in [`Language`] set.
//!
//! ## Example
//!
//! ```rust
//! use stdheader::templates::{CommentTemplate, HeaderText};
//!
//! # fn main() -> Result<(), stdheader::error::HeaderError> {
//! let template = CommentTemplate::from_properties_str("header.start=/*\nline.starts=\\ * \nheader.end=\\ */")?;
//! let header = HeaderText::parse("Copyright 2024 X");
//!
//! let block = template.compose(header.lines());
//! assert!(block.contains(" * Copyright 2024 X"));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::config::TemplateConfig;
use crate::error::HeaderError;
use crate::verbose_log;

/// The line terminator written after every emitted header line.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// The line terminator written after every emitted header line.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Comment syntax for one language.
///
/// # Fields
///
/// * `block_start` - Emitted once, opening the block (e.g. "/*")
/// * `line_prefix` - Prepended to every header line (e.g. " * ")
/// * `block_end` - Emitted once, closing the block (e.g. " */")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTemplate {
  pub block_start: String,
  pub line_prefix: String,
  pub block_end: String,
}

impl CommentTemplate {
  pub fn new(block_start: &str, line_prefix: &str, block_end: &str) -> Self {
    Self {
      block_start: block_start.to_string(),
      line_prefix: line_prefix.to_string(),
      block_end: block_end.to_string(),
    }
  }

  /// Parses a template from properties text.
  ///
  /// # Errors
  ///
  /// Returns a configuration error if the text is malformed or any of
  /// `header.start`, `line.starts`, `header.end` is missing.
  pub fn from_properties_str(text: &str) -> Result<Self, HeaderError> {
    TemplateConfig::from_properties_str(text)
      .and_then(Self::try_from)
      .map_err(|e| HeaderError::configuration("<inline>", e))
  }

  /// Loads a template file. Files ending in `.toml` are read as TOML, any
  /// other file as properties text.
  ///
  /// # Errors
  ///
  /// Returns a configuration error if the file cannot be read, cannot be
  /// parsed, or does not define all three settings.
  pub fn load(path: &Path) -> Result<Self, HeaderError> {
    let template = TemplateConfig::load(path)
      .and_then(Self::try_from)
      .map_err(|e| HeaderError::configuration(path.display().to_string(), e))?;

    verbose_log!("Using template: {}", template);
    Ok(template)
  }

  /// Formats header lines as a comment block.
  ///
  /// The result is `block_start`, then `line_prefix` + line for each input
  /// line, then `block_end`, each followed by [`LINE_ENDING`]. Lines are
  /// passed through verbatim; a line must not itself contain a line break.
  pub fn compose<I, S>(&self, lines: I) -> String
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut result = String::new();

    result.push_str(&self.block_start);
    result.push_str(LINE_ENDING);

    for line in lines {
      result.push_str(&self.line_prefix);
      result.push_str(line.as_ref());
      result.push_str(LINE_ENDING);
    }

    result.push_str(&self.block_end);
    result.push_str(LINE_ENDING);

    result
  }
}

impl TryFrom<TemplateConfig> for CommentTemplate {
  type Error = crate::config::ConfigError;

  fn try_from(config: TemplateConfig) -> Result<Self, Self::Error> {
    let (block_start, line_prefix, block_end) = config.require()?;
    Ok(Self {
      block_start,
      line_prefix,
      block_end,
    })
  }
}

impl fmt::Display for CommentTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} {:?} {:?}", self.block_start, self.line_prefix, self.block_end)
  }
}

/// Languages with a built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
  /// `/* ... */` with ` * ` line prefixes
  Java,
  /// `/* ... */` with ` * ` line prefixes
  C,
  /// `//` line comments
  Cpp,
  /// `#` line comments (also used for sh, zsh and similar)
  Bash,
}

impl Language {
  pub fn template(self) -> CommentTemplate {
    match self {
      Language::Java | Language::C => CommentTemplate::new("/*", " * ", " */"),
      Language::Cpp => CommentTemplate::new("//", "// ", "//"),
      Language::Bash => CommentTemplate::new("#", "# ", "#"),
    }
  }
}

/// The ordered lines of a header, e.g. a copyright notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderText {
  lines: Vec<String>,
}

impl HeaderText {
  /// Splits text on line boundaries (`\n`, `\r\n` or a lone `\r`). A
  /// trailing line terminator does not produce an extra empty line.
  pub fn parse(text: &str) -> Self {
    Self {
      lines: text
        .replace("\r\n", "\n")
        .split_terminator(['\n', '\r'])
        .map(str::to_string)
        .collect(),
    }
  }

  /// Reads header text from a file.
  ///
  /// # Errors
  ///
  /// Returns an I/O error if the file cannot be read or is not valid UTF-8.
  pub fn load(path: &Path) -> Result<Self, HeaderError> {
    let content = std::fs::read_to_string(path).map_err(|e| HeaderError::io(path, e))?;
    Ok(Self::parse(&content))
  }

  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FailureKind;

  fn block_lines(block: &str) -> Vec<&str> {
    block.split_terminator(LINE_ENDING).collect()
  }

  #[test]
  fn test_compose_block_style() {
    let template = CommentTemplate::new("/*", " * ", " */");
    let block = template.compose(["Copyright 2024 X", "All rights reserved."]);

    assert_eq!(
      block_lines(&block),
      vec!["/*", " * Copyright 2024 X", " * All rights reserved.", " */"]
    );
    assert!(block.ends_with(LINE_ENDING));
  }

  #[test]
  fn test_compose_empty_header() {
    let template = CommentTemplate::new("#", "# ", "#");
    let block = template.compose(Vec::<String>::new());

    assert_eq!(block, format!("#{LINE_ENDING}#{LINE_ENDING}"));
  }

  #[test]
  fn test_compose_passes_content_through() {
    let template = CommentTemplate::new("/*", " * ", " */");
    let block = template.compose(["*/ not escaped", ""]);

    assert_eq!(block_lines(&block), vec!["/*", " * */ not escaped", " * ", " */"]);
  }

  #[test]
  fn test_compose_line_count_matches_header() {
    let template = Language::Cpp.template();
    for count in [1usize, 3, 10] {
      let lines: Vec<String> = (0..count).map(|i| format!("line {i}")).collect();
      let block = template.compose(&lines);
      let out = block_lines(&block);

      assert_eq!(out.len(), count + 2);
      assert_eq!(out[0], "//");
      assert_eq!(out[count + 1], "//");
      for (i, line) in lines.iter().enumerate() {
        assert_eq!(out[i + 1], format!("// {line}"));
      }
    }
  }

  #[test]
  fn test_from_properties_str() {
    let template = CommentTemplate::from_properties_str("header.start=/*\nline.starts=\\ * \nheader.end=\\ */\n")
      .expect("valid template");

    assert_eq!(template, CommentTemplate::new("/*", " * ", " */"));
  }

  #[test]
  fn test_from_properties_str_missing_key_fails_fast() {
    let err = CommentTemplate::from_properties_str("header.start=/*\nline.starts=\\ * \n").expect_err("should fail");
    assert_eq!(err.kind(), FailureKind::Configuration);
  }

  #[test]
  fn test_from_properties_str_malformed() {
    let err = CommentTemplate::from_properties_str("header.start=\\u00").expect_err("should fail");
    assert_eq!(err.kind(), FailureKind::Configuration);
  }

  #[test]
  fn test_builtin_languages() {
    assert_eq!(Language::Java.template(), CommentTemplate::new("/*", " * ", " */"));
    assert_eq!(Language::C.template(), Language::Java.template());
    assert_eq!(Language::Cpp.template().line_prefix, "// ");
    assert_eq!(Language::Bash.template().line_prefix, "# ");
  }

  #[test]
  fn test_header_text_parse() {
    let header = HeaderText::parse("one\r\ntwo\n\nfour\n");
    assert_eq!(header.lines(), ["one", "two", "", "four"]);

    assert!(HeaderText::parse("").is_empty());
  }

  #[test]
  fn test_header_text_parse_lone_carriage_returns() {
    let header = HeaderText::parse("Line one\rLine two\r");
    assert_eq!(header.lines(), ["Line one", "Line two"]);

    let mixed = HeaderText::parse("a\rb\r\nc\nd");
    assert_eq!(mixed.lines(), ["a", "b", "c", "d"]);
    assert!(mixed.lines().iter().all(|line| !line.contains(['\r', '\n'])));
  }
}

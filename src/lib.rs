//! # stdheader
//!
//! Prepends a commented header, such as a copyright notice, to source files.
//! The comment syntax comes from a per-language template: the line that
//! opens the block, the prefix of every header line, and the line that
//! closes the block.
//!
//! ```text
//! header.start=/*
//! line.starts=\ *
//! header.end=\ */
//! ```
//!
//! Files are rewritten in full with the header block in front of their
//! unchanged content. Nothing checks whether a header is already present, so
//! running twice stacks two headers.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use stdheader::processor::HeaderComposer;
//!
//! fn main() -> Result<(), stdheader::error::HeaderError> {
//!   let composer = HeaderComposer::from_template_file(Path::new("c.header.properties"))?;
//!   composer.add_header(Path::new("Copyright.txt"), Path::new("src/main.c"))?;
//!   Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - The header composer
//! * [`templates`] - Comment templates and header text
//! * [`config`] - Template file parsing
//! * [`error`] - Error kinds
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`processor`]: crate::processor
//! [`templates`]: crate::templates
//! [`config`]: crate::config
//! [`error`]: crate::error
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod templates;

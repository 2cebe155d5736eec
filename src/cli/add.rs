//! # Add Command
//!
//! Prepends a header to every file given on the command line, one file at a
//! time, and reports each result.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::diff::DiffManager;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_file_reports, print_start_message, print_summary};
use crate::processor::HeaderComposer;
use crate::report::ProcessingSummary;
use crate::templates::Language;
use crate::verbose_log;

/// Arguments for adding headers
#[derive(Args, Debug)]
pub struct AddArgs {
  /// Files to prepend the header to. Each file is processed on its own.
  #[arg(required = true, value_name = "FILES")]
  pub files: Vec<PathBuf>,

  /// Header text file, e.g. a copyright notice
  #[arg(long = "header", short = 'H', value_name = "FILE")]
  pub header: PathBuf,

  /// Comment template file (properties, or TOML when ending in .toml)
  #[arg(long, short = 't', value_name = "FILE", required_unless_present = "lang")]
  pub template: Option<PathBuf>,

  /// Use a built-in comment template instead of a template file
  #[arg(long, short = 'l', value_enum, conflicts_with = "template")]
  pub lang: Option<Language>,

  /// Compute the new content without writing any file
  #[arg(long, short = 'n')]
  pub dry_run: bool,

  /// Print a diff of each planned change (dry run only)
  #[arg(long, requires = "dry_run")]
  pub show_diff: bool,

  /// Save diffs of planned changes to a file (dry run only)
  #[arg(long, short = 'o', value_name = "FILE", requires = "dry_run")]
  pub save_diff: Option<PathBuf>,

  /// Stop at the first file that fails instead of continuing
  #[arg(long)]
  pub fail_fast: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl AddArgs {
  fn composer(&self) -> Result<HeaderComposer> {
    match (&self.template, self.lang) {
      (Some(path), _) => HeaderComposer::from_template_file(path)
        .with_context(|| format!("Failed to load comment template from {}", path.display())),
      (None, Some(lang)) => {
        debug!(?lang, "using built-in template");
        Ok(HeaderComposer::from(lang))
      }
      (None, None) => anyhow::bail!("Missing required argument: --template <FILE> or --lang <LANG>"),
    }
  }
}

/// Run the add command. Returns `true` when at least one file failed.
pub fn run_add(args: AddArgs) -> Result<bool> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let composer = args.composer()?;
  verbose_log!("Template: {}", composer.template());

  let start = Instant::now();
  print_start_message(args.files.len(), args.dry_run);

  let reports = if args.dry_run {
    let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
    diff_manager.init()?;

    let mut diff_error = None;
    let reports = composer.plan_all(&args.header, &args.files, args.fail_fast, |path, plan| {
      if !diff_manager.is_active() || diff_error.is_some() {
        return;
      }
      if let Err(e) = diff_manager.display_diff(path, plan) {
        diff_error = Some(e);
      }
    });

    if let Some(e) = diff_error {
      return Err(e);
    }
    reports
  } else {
    composer.add_header_to_all(&args.header, &args.files, args.fail_fast)
  };

  let summary = ProcessingSummary::from_reports(&reports, args.files.len(), start.elapsed());

  print_file_reports(&reports);
  print_summary(&summary);

  Ok(summary.has_failures())
}

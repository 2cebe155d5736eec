//! # stdheader
//!
//! Prepends a commented copyright or license header to source files.

use std::process;

use anyhow::Result;
use stdheader::cli::{Cli, run_add};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  let has_failures = run_add(cli.add_args)?;
  if has_failures {
    process::exit(1);
  }

  Ok(())
}

//! Parse-legacy subcommand for irods-env CLI
//!
//! Reads a flat `name value` environment file and prints the canonical
//! properties it maps to.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the parse-legacy subcommand
#[derive(Args, Debug)]
pub struct ParseLegacyArgs {
    /// Legacy environment file (for example `~/.irods/.irodsEnv`)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

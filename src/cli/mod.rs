//! CLI command definitions for irods-env
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod legacy;
pub mod show;

use clap::{Parser, Subcommand};
use legacy::ParseLegacyArgs;
use show::ShowArgs;
use std::path::PathBuf;

/// Resolve and inspect the iRODS client environment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Environment file (overrides IRODS_ENVIRONMENT_FILE)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Session environment file (overrides IRODS_SESSION_ENVIRONMENT_FILE)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub session_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the environment and print it (default if no subcommand given)
    Show(ShowArgs),

    /// Print the captured property store
    Properties,

    /// Read a legacy flat environment file and print it as JSON
    ParseLegacy(ParseLegacyArgs),

    /// List the environment variables consulted for each key
    Vars,
}

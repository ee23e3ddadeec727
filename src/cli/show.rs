//! Show subcommand for irods-env CLI
//!
//! Resolves the environment for a role and prints the result.

use crate::config::Role;
use crate::format::OutputFormat;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Role argument for the show subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RoleArg {
    /// Defaults, environment files, then environment variables (default)
    #[default]
    Client,
    /// Structured server configuration only
    Server,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Client => Role::Client,
            RoleArg::Server => Role::Server,
        }
    }
}

/// Arguments for the show subcommand
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Which resolver to run
    #[arg(short, long, value_enum, default_value_t = RoleArg::Client)]
    pub role: RoleArg,

    /// Server configuration file (required for the server role)
    #[arg(long, value_name = "FILE")]
    pub server_config: Option<PathBuf>,

    /// Output format: text (default), json, or yaml
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}

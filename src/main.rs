//! irods-env
//!
//! Resolves the iRODS client environment from files, environment variables
//! and defaults, and prints the result.

use anyhow::Result;
use clap::Parser;
use irods_env::cli::legacy::ParseLegacyArgs;
use irods_env::cli::show::ShowArgs;
use irods_env::cli::{Cli, Command};
use irods_env::config::{
    ConfigLoader, ConfigPaths, ProcessEnv, Role, load_legacy_file, load_server_config,
};
use irods_env::format::{
    format_env_vars_text, format_properties_text, format_resolution,
};
use irods_env::logging::LogLevelFilter;
use irods_env::resolver::{ResolveContext, resolve};
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::filter_fn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => install_subscriber(level, std::io::stdout, true)?,
        "2" | "stderr" => install_subscriber(level, std::io::stderr, true)?,
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            install_subscriber(level, file, false)?;
        }
    }

    let mut paths = ConfigPaths::discover(&ProcessEnv);
    if let Some(file) = cli.env_file {
        paths.environment_file = Some(file);
    }
    if let Some(file) = cli.session_file {
        paths.session_file = Some(file);
    }

    match cli.command {
        Some(Command::Show(args)) => run_show(paths, &args),
        Some(Command::Properties) => run_properties(paths),
        Some(Command::ParseLegacy(args)) => run_parse_legacy(&args),
        Some(Command::Vars) => {
            print!("{}", format_env_vars_text());
            Ok(())
        }
        None => run_show(paths, &ShowArgs::default()),
    }
}

/// Install the fmt subscriber, gated by RUST_LOG (or `level`) and by the
/// threshold a client resolution publishes.
fn install_subscriber<W>(level: Level, writer: W, ansi: bool) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .finish()
        .with(filter_fn(|meta| {
            LogLevelFilter::global().allows(meta.level())
        }));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run_show(paths: ConfigPaths, args: &ShowArgs) -> Result<()> {
    let role = Role::from(args.role);

    let server_config = match args.server_config {
        Some(ref path) => Some(load_server_config(path)?),
        None => None,
    };
    let loader = match role {
        Role::Client => ConfigLoader::load_with_paths(paths)?,
        Role::Server => ConfigLoader::load_with_paths(ConfigPaths::default())?,
    };
    for file in loader.loaded_files() {
        debug!(path = %file.display(), "captured environment file");
    }

    let mut ctx = ResolveContext::new(loader.store());
    if let Some(ref config) = server_config {
        ctx = ctx.with_server_config(config);
    }
    let resolution = resolve(role, &ctx)?;

    print!("{}", format_resolution(&resolution, args.format)?);
    Ok(())
}

fn run_properties(paths: ConfigPaths) -> Result<()> {
    let loader = ConfigLoader::load_with_paths(paths)?;
    print!("{}", format_properties_text(loader.store()));
    Ok(())
}

fn run_parse_legacy(args: &ParseLegacyArgs) -> Result<()> {
    let store = load_legacy_file(&args.file)?;
    let json = if args.compact {
        serde_json::to_string(&store)?
    } else {
        serde_json::to_string_pretty(&store)?
    };
    println!("{}", json);
    Ok(())
}

//! eqlink Host - reads method calls from stdin, writes responses to stdout

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eqlink_core::TargetMode;
use eqlink_host::{load_config, Host};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "eqlink=debug";

#[derive(Parser, Debug)]
#[command(name = "eqlink-host", version, about = "Line-delimited JSON equalizer bridge")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured target mode (global or session)
    #[arg(long)]
    target_mode: Option<TargetMode>,

    /// Enable processing right after every initialize
    #[arg(long)]
    enable_on_initialize: bool,

    /// Log filter, takes precedence over RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, logs go to stderr
    let filter = match &args.log_filter {
        Some(directives) => EnvFilter::try_new(directives).context("invalid --log-filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting eqlink host");

    let mut config = load_config(args.config.as_deref()).context("failed to load config")?;
    if let Some(mode) = args.target_mode {
        config.target_mode = mode;
    }
    if args.enable_on_initialize {
        config.enable_on_initialize = true;
    }
    config.validate().context("invalid configuration")?;

    let host = Host::new(config).context("failed to start equalizer service")?;
    host.run(io::stdin().lock(), io::stdout().lock())
        .context("transport I/O failed")?;

    // Dropping the host stops the control thread and releases the effect
    drop(host);
    info!("eqlink host exiting");
    Ok(())
}

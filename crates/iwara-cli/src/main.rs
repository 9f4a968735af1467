use anyhow::{Context, Result};
use clap::Parser;
use iwara_core::{IwaraApi, Session};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod commands;
mod config;

use config::{Config, LogFormat};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Session token, overrides the one in the config file
    #[arg(long, env = "IWARA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // stdout carries the JSON result
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::get_config_path(args.config.as_deref());
    let config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    init_logging(config.log_format);
    if let Some(path) = &config_path {
        info!("Loaded config from: {}", path);
    }

    let session = args
        .token
        .or(config.token)
        .map(Session::new)
        .unwrap_or_default();

    let api = IwaraApi::with_config(config.client).context("Failed to build HTTP client")?;
    let succeeded = commands::run(&api, &session, args.command).await?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

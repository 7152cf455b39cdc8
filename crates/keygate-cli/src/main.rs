//! keygate - interactive client for the random-number / add-numbers demo backend.
//!
//! Logs in by deriving an API key from a username and password, then calls
//! the backend's protected endpoints with that key. The key lives only in
//! this process.

mod app;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keygate_core::auth::{ApiKey, MemorySlot};
use keygate_core::{Config, SessionController};

use app::Shell;

#[derive(Parser, Debug)]
#[command(name = "keygate", version, about)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = "KEYGATE_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "KEYGATE_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// API key from an earlier session, verified on start-up
    #[arg(long, env = "KEYGATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Write the effective base URL and timeout to the config file
    #[arg(long)]
    save_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration and exit
    Config,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn effective_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    config
}

fn initial_slot(api_key: Option<&str>) -> MemorySlot {
    match api_key.map(ApiKey::parse) {
        Some(Some(key)) => MemorySlot::seeded(key),
        Some(None) => {
            warn!("Ignoring malformed API key; expected 64 hex characters");
            MemorySlot::new()
        }
        None => MemorySlot::new(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();

    let config = effective_config(&cli);

    if cli.save_config {
        config.save()?;
        println!("Saved configuration to {}", Config::config_path()?.display());
    }

    if let Some(Command::Config) = cli.command {
        println!("{}", describe_config(&config)?);
        return Ok(());
    }

    info!(base_url = %config.base_url, "keygate starting");

    let api = config.api_client()?;
    let slot = initial_slot(cli.api_key.as_deref());
    let mut controller = SessionController::new(api, slot);

    match controller.recover().await {
        Ok(true) => println!("Session restored."),
        Ok(false) => {}
        Err(e) => println!("Could not restore session: {}", e),
    }

    let mut shell = Shell::new(controller);
    shell.run().await?;

    info!("keygate shutting down");
    Ok(())
}

fn describe_config(config: &Config) -> Result<String> {
    Ok(format!(
        "base_url: {}\nrequest_timeout_secs: {}\nconfig_file: {}",
        config.base_url,
        config.request_timeout_secs,
        Config::config_path()?.display()
    ))
}

//! Flashdeck - study flashcard decks from the terminal.
//!
//! Every command talks to the flashcard backend through the shared
//! `ApiClient`, so an expired access token is renewed transparently. When
//! the session cannot be renewed the command fails and asks the user to log
//! in again.

mod commands;
mod output;
mod prompt;
mod study;

use std::io;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use flashdeck_core::auth::MemoryTokenStore;
use flashdeck_core::{ApiClient, ApiError, Config, SessionStatus, TokenStore};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Commands, Context};

#[derive(Parser)]
#[command(name = "flashdeck")]
#[command(about = "Study flashcard decks with spaced repetition")]
#[command(version)]
struct Cli {
    /// Backend API base URL (overrides FLASHDECK_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep session tokens in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let mut ctx = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    let session_status = ctx.client.session().subscribe();
    let result = cli.command.execute(&mut ctx).await;
    let session_ended = *session_status.borrow() == SessionStatus::Ended;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            if session_ended {
                eprintln!("Run `flashdeck login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

fn build_context(cli: &Cli) -> Result<Context> {
    let config = Config::load().context("Failed to load configuration")?;

    let store: Box<dyn TokenStore> = if cli.ephemeral {
        debug!("Using in-memory token storage");
        Box::new(MemoryTokenStore::new())
    } else {
        config.token_store().context("Failed to open token storage")?
    };

    let client = ApiClient::from_config(&config, cli.api_url.as_deref(), store)?;
    info!(base_url = %client.gateway().base_url(), "Flashdeck starting");

    Ok(Context {
        client,
        config,
        json: cli.json,
    })
}

/// Print a failed command's error next to the command that caused it.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<ApiError>() {
        Some(api) => {
            debug!(error = %api, "Command failed");
            eprintln!("Error: {}", api.user_message());
        }
        None => eprintln!("Error: {:#}", error),
    }
}

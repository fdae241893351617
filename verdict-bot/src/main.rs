//! Verdict Bot
//!
//! Watches the review status of a homework submission and reports every
//! change to a Telegram chat.
//!
//! Architecture:
//! - Configuration: Credentials and timings from the environment
//! - Repositories: Status API fetches and chat delivery
//! - Scheduler: The poll cycle with change detection
//!
//! The bot polls the status API, validates and interprets the reply, and
//! sends a message whenever the interpreted outcome differs from the last
//! one sent. Failures are reported to the same chat.

mod config;
mod repository;
mod scheduler;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdict_client::{StatusApiClient, TelegramClient};
use verdict_core::StatusError;

use crate::config::Config;
use crate::repository::{
    HttpStatusRepository, NotificationRepository, StatusRepository,
    TelegramNotificationRepository,
};
use crate::scheduler::{PollState, StatusPoller};

#[derive(Parser)]
#[command(name = "verdict-bot")]
#[command(about = "Forwards homework review status changes to Telegram", long_about = None)]
struct Cli {
    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Dotenv file to load instead of `.env`
    #[arg(long, env = "VERDICT_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdict_bot=debug,verdict_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    load_env_file(cli.env_file.as_deref())?;

    info!("Starting Verdict Bot");

    let (poller, mut state) = assemble(Config::from_env(), http_repositories)?;

    if cli.once {
        let outcome = poller.poll_once(&mut state).await;
        info!(
            "Single cycle finished (notified: {}): {}",
            outcome.notified, outcome.message
        );
        return Ok(());
    }

    poller.run(&mut state, shutdown_signal()).await;

    info!("Verdict Bot stopped");
    Ok(())
}

/// The two capabilities the poller is built from
type Repositories = (Arc<dyn StatusRepository>, Arc<dyn NotificationRepository>);

/// Wires the poller from a loaded configuration
///
/// Repositories are only built once the configuration is complete, so a
/// missing value stops startup before anything is fetched or sent.
fn assemble<B>(
    config: Result<Config, StatusError>,
    build_repositories: B,
) -> Result<(StatusPoller, PollState)>
where
    B: FnOnce(&Config) -> Result<Repositories>,
{
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Refusing to start");
        }
    };
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    let (statuses, notifier) = build_repositories(&config)?;
    let poller = StatusPoller::new(statuses, notifier, config.poll_interval);

    Ok((poller, PollState::starting_now(config.lookback_period)))
}

/// Builds the HTTP-backed repositories
fn http_repositories(config: &Config) -> Result<Repositories> {
    let statuses = StatusApiClient::new(
        config.practicum_endpoint.clone(),
        config.practicum_token.clone(),
        config.request_timeout,
    )
    .context("Failed to build status API client")?;
    let telegram = TelegramClient::new(
        config.telegram_api_url.clone(),
        config.telegram_token.clone(),
        config.request_timeout,
    )
    .context("Failed to build Telegram client")?;

    Ok((
        Arc::new(HttpStatusRepository::new(statuses)),
        Arc::new(TelegramNotificationRepository::new(
            telegram,
            config.telegram_chat_id.clone(),
        )),
    ))
}

/// Loads variables from a dotenv file; a missing default `.env` is fine
fn load_env_file(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                if !e.not_found() {
                    return Err(e).context("Failed to load .env");
                }
            }
        }
    }
    Ok(())
}

/// Completes on Ctrl-C, or on SIGTERM where available
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: configuration and the inbound update model
//! - Infrastructure: bot-API client and JSON storage
//! - Application: dispatcher, predicates, polling loop, guards
//! - Interface: private-chat and group handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::dispatcher::{Dispatcher, SharedContext};
use crate::application::guard::RateLimitGuard;
use crate::application::poller::Poller;
use crate::domain::config::AppConfig;
use crate::domain::traits::Transport;
use crate::infrastructure::chat_api::HttpBotApi;
use crate::infrastructure::storage::Storage;
use crate::interface::dm::DmHandlers;
use crate::interface::group::GroupHandlers;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = AppConfig::load("data/config.yaml")?;

    // 2. Logging setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting guildbot...");

    // 3. Durable state
    let storage = Arc::new(Storage::load(
        &config.storage.path,
        config.storage.backup_path.clone().map(PathBuf::from),
    )?);
    // The owner always counts as an admin; make that durable on first run.
    if !storage.is_admin(config.bot.owner_id).await {
        storage.add_admin(config.bot.owner_id, None, None).await?;
    }

    // 4. Transport and guards
    let transport: Arc<dyn Transport> =
        Arc::new(HttpBotApi::new(&config.bot.api_url, &config.bot.token)?);
    let guard = Arc::new(RateLimitGuard::from_seconds(
        config.security.rate_limit_interval,
        config.security.rate_limit_burst,
    ));

    // 5. Handler registry
    let mut dispatcher = Dispatcher::new(SharedContext::new());
    let dm = Arc::new(DmHandlers::new(
        storage.clone(),
        transport.clone(),
        guard,
        config.bot.owner_id,
        config.bot.review_chat_id.clone(),
    ));
    for (predicate, action) in dm.bindings() {
        dispatcher.register(predicate, action);
    }
    let group = Arc::new(GroupHandlers::new(
        storage.clone(),
        transport.clone(),
        config.bot.owner_id,
        config.xp.clone(),
        config.cups.clone(),
    ));
    for (predicate, action) in group.bindings() {
        dispatcher.register(predicate, action);
    }

    // 6. Poll until shutdown
    let poller = Arc::new(Poller::new(transport, dispatcher));
    let runner = {
        let poller = poller.clone();
        tokio::spawn(async move { poller.run().await })
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");
    poller.stop();
    runner.await.ok();
    Ok(())
}

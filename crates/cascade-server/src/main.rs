//! Main workflow service executable
//!
//! Serves the cron reconcile trigger, the approval endpoints, and the
//! webhook endpoints over HTTP.

mod dto;
mod http_service;

use anyhow::Context;
use cascade_core::clients::{ContentStoreClient, HttpDeliverySender};
use cascade_core::services::{ApprovalManager, RuntimeStats, WebhookManager};
use cascade_core::workflow::ScheduledPublishReconciler;
use cascade_core::CascadeConfig;
use clap::{Arg, Command};
use http_service::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("cascade-server")
        .version("1.0.0")
        .about("Cascade content workflow service")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("./settings.json"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("Override the configured HTTP port"),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let config = CascadeConfig::from_file(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    log::info!("Loaded configuration from {}", config_path);

    let port = match matches.get_one::<String>("port") {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("Invalid port: {}", raw))?,
        None => config.server.port,
    };

    // Initialize the injected counter service before anything records into it
    let stats = Arc::new(RuntimeStats::new());

    // Initialize the document store client and wire up the components
    let store = Arc::new(ContentStoreClient::new(config.store.clone())?);
    log::info!(
        "Document store client ready for dataset '{}'",
        config.store.dataset
    );

    let sender = Arc::new(HttpDeliverySender::new(config.webhooks.timeout_secs)?);

    let reconciler = Arc::new(ScheduledPublishReconciler::new(store.clone(), stats.clone()));
    let approvals = Arc::new(ApprovalManager::new(store.clone(), stats.clone()));
    let webhooks = Arc::new(WebhookManager::new(store, sender, stats.clone()));

    let state = AppState {
        reconciler,
        approvals,
        webhooks,
        stats,
        shared_secret: Arc::new(config.auth.shared_secret.clone()),
    };

    let router = http_service::router(state);

    let address = format!("{}:{}", config.server.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to listen on {}", address))?;

    log::info!("Cascade workflow service listening on {}", address);

    axum::serve(listener, router)
        .await
        .context("Server exited with error")?;

    Ok(())
}

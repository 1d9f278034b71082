//! labor-exchange entry point.
//!
//! Builds the store, seeds it, wires the service and logs every market
//! event until interrupted.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use labor_exchange::config::{LogFormat, MarketConfig};
use labor_exchange::domain::EventBus;
use labor_exchange::seed::{SeedSummary, seed_store};
use labor_exchange::service::MarketService;
use labor_exchange::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = MarketConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
    tracing::info!(log_format = %config.log_format, "starting labor-exchange");

    // Build domain layer
    let mut store = Store::new();
    if config.seed_enabled {
        seed_store(&mut store, config.seed_admin_id).context("seeding store")?;
    }
    let summary = SeedSummary::of(&store);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let service = MarketService::new(store, event_bus);

    let mut events = service.event_bus().subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(event = %json, "market event"),
                    Err(err) => tracing::warn!(%err, "unserializable market event"),
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event listener lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let categories = service.categories().await;
    tracing::info!(count = categories.len(), categories = ?categories, "store ready");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutting down");

    drop(service);
    listener.abort();
    Ok(())
}

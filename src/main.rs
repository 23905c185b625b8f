use chrono::Utc;
use futures_util::TryStreamExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use license_events::{Event, EventStore, StatusVocabulary, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,license_events=debug")),
        )
        .init();

    tracing::info!("🚀 Starting license-events demo");

    // === 1. Open the store on an in-memory database ===
    let store = EventStore::connect(&StoreConfig::in_memory(), StatusVocabulary::default()).await?;

    // === 2. Walk one license through a device lifecycle ===
    let license_status_id = 7;

    let register = Event {
        id: 0,
        device_name: Some("Kindle".to_string()),
        timestamp: Utc::now(),
        type_name: String::new(),
        device_id: Some("dev-1".to_string()),
        license_status_id,
    };
    let event_id = store.append(&register, 1).await?;
    tracing::info!("✅ Device registered (event {})", event_id);

    let renew = Event {
        timestamp: Utc::now(),
        ..register.clone()
    };
    store.append(&renew, 2).await?;
    tracing::info!("✅ License renewed");

    let status = store.device_status(license_status_id, "dev-1").await?;
    tracing::info!("📄 Device dev-1 status: {}", status);

    // === 3. Read the derived views back ===
    let history: Vec<Event> = store.events_for_license(license_status_id).try_collect().await?;
    tracing::info!("📜 {} events recorded for license {}", history.len(), license_status_id);

    let listing = store.registered_devices_list(license_status_id).await?;
    tracing::info!(
        "📱 {} registered device(s): {}",
        listing.devices.len(),
        serde_json::to_string(&listing)?,
    );

    // === 4. Return the device; the status read-model follows ===
    let returned = Event {
        timestamp: Utc::now(),
        ..register.clone()
    };
    store.append(&returned, 3).await?;

    let status = store.device_status(license_status_id, "dev-1").await?;
    tracing::info!("📄 Device dev-1 status after return: {}", status);

    tracing::info!("🎉 Demo complete!");

    Ok(())
}

//! OpenSASE Storefront - Self-hosted storefront backend

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opensase_storefront::{api, services::EventPublisher, AppConfig, AppState, MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "opensase_storefront=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pg = PgStore::connect(url.expose_secret(), config.db_max_connections).await.context("failed to connect to database")?;
            pg.migrate().await.context("failed to run migrations")?;
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "failed to connect to NATS, events will only be logged");
                None
            }
        },
        None => None,
    };

    let seed_file = config.products_seed_file.clone();
    let addr = config.socket_addr();
    tracing::info!(access_mode = ?config.access_mode, "starting storefront");
    let state = AppState::new(config, store, EventPublisher::new(nats));

    if let Some(path) = seed_file {
        state.catalog.seed_from_file(&path).await.context("failed to seed catalog")?;
    }

    let app = api::router(state);
    tracing::info!("🚀 OpenSASE Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

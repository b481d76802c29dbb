//! Backend entry-point: wires the document store, reference sync worker,
//! REST endpoints and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, build_http_state, create_server};
use taskboard::inbound::http::health::HealthState;
use taskboard::outbound::{InMemoryDocumentStore, reference_sync_channel};
use taskboard::settings::ServerSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from(&settings);

    let store = Arc::new(InMemoryDocumentStore::new());
    let (sync, worker) = reference_sync_channel(Arc::clone(&store));
    let sync = Arc::new(sync);
    actix_web::rt::spawn(worker.run());

    let http_state = build_http_state(store, Arc::clone(&sync), config.list_defaults);
    let health_state = web::Data::new(HealthState::new().with_reference_sync(sync));

    info!(host = %config.host, port = config.port, "starting taskboard");
    create_server(health_state, http_state, config)?.await
}

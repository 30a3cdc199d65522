use std::sync::Arc;

use activation_service::binding::{BindingStore, MemoryBindingStore, RedisBindingStore};
use activation_service::config::{Config, StoreBackend};
use activation_service::http::build_router;
use activation_service::shutdown::wait_for_signal;
use activation_service::ActivationService;
use rust_common::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(&config.tracing)?;

    info!(
        environment = ?config.environment,
        store = config.store.name(),
        codes = config.catalog.len(),
        "Starting Activation Service"
    );
    for name in &config.insecure_defaults {
        warn!(variable = *name, "Using insecure development default");
    }

    let store: Arc<dyn BindingStore> = match &config.store {
        StoreBackend::Memory => Arc::new(MemoryBindingStore::new()),
        StoreBackend::Redis { url } => Arc::new(RedisBindingStore::connect(url).await?),
    };

    let service = Arc::new(ActivationService::from_config(&config, store));
    let app = build_router(service);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Activation Service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

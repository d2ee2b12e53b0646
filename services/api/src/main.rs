use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod models;
mod routes;
mod settings;
mod state;
mod validation;

use common::{config::StorageConfig, storage::select_storage};

use crate::{settings::ServerConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let server_config = ServerConfig::load()?;

    // Pick the user storage backend once for the lifetime of the process
    let storage = select_storage(&StorageConfig::from_env())?;
    info!("User storage backend: {}", storage.backend_name());

    let app_state = AppState::new(storage);

    // Start the web server
    let app = routes::create_router(app_state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Core library for the music streaming server: storage catalog, byte-range
//! streaming and the HTTP routes that expose them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod streaming;

pub use catalog::Catalog;
pub use config::{AppConfig, CorsConfig, ServerConfig, StorageConfig};
pub use error::{AppError, Result};
pub use handlers::create_routes;
pub use middleware::cors::cors_layer_from_config;
pub use streaming::{ByteRangeRequest, RangeSpec, StreamHandler, StreamResponse};

use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub catalog: Catalog,
    pub stream_handler: StreamHandler,
}

impl AppState {
    pub fn new(storage: &StorageConfig) -> Self {
        let catalog = Catalog::new(storage);
        let stream_handler = StreamHandler::new(catalog.clone());

        Self {
            app_name: "Music Streaming Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            catalog,
            stream_handler,
        }
    }
}

pub fn create_app(config: &AppConfig) -> Router {
    create_app_with_state(AppState::new(&config.storage), config)
}

pub fn create_app_with_state(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

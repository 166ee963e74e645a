//! # Echelon HTTP Server
//!
//! HTTP server exposing the echelon CRUD API.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT` - HTTP server port (default: 8080)
//! - `ECHELON_SEPARATOR` - scope separator (default: `::`)
//! - `ECHELON_COLLECTION` - backing collection name (default: `echelons`)
//! - `MONGODB_URI` - MongoDB connection string (requires the `mongo`
//!   feature; falls back to the in-memory store when unset)
//! - `MONGODB_DB` - MongoDB database name (default: `echelon`)
//! - `RUST_LOG` - log level (default: info)

use anyhow::Context;
use axum::{serve, Router};
use echelon_authz::store::{EchelonStore, MemoryStore};
use echelon_authz::{EchelonConfig, EchelonRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the store backend from the environment
async fn build_store(config: &EchelonConfig) -> anyhow::Result<Arc<dyn EchelonStore>> {
    #[cfg(feature = "mongo")]
    if let Ok(uri) = std::env::var("MONGODB_URI") {
        let database =
            std::env::var("MONGODB_DB").unwrap_or_else(|_| "echelon".to_string());
        info!("Using MongoDB store: db={}, collection={}", database, config.collection);
        let store = echelon_authz::store::MongoStore::connect(&uri, &database, &config.collection)
            .await
            .context("failed to connect to MongoDB")?;
        return Ok(Arc::new(store));
    }

    info!("Using in-memory store: collection={}", config.collection);
    Ok(Arc::new(MemoryStore::new()))
}

/// Attach middleware layers to the API router
fn create_router(registry: EchelonRegistry) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    echelon_authz::api::router(registry).layer(ServiceBuilder::new().layer(trace).layer(cors))
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

/// Main server entrypoint
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Echelon server v{}", echelon_authz::VERSION);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let mut config = EchelonConfig::default();
    if let Ok(separator) = std::env::var("ECHELON_SEPARATOR") {
        config = config.with_separator(separator);
    }
    if let Ok(collection) = std::env::var("ECHELON_COLLECTION") {
        config = config.with_collection(collection);
    }

    info!("Configuration:");
    info!("  Port: {}", port);
    info!("  Separator: {}", config.separator);
    info!("  Collection: {}", config.collection);

    let store = build_store(&config).await?;
    let registry = EchelonRegistry::with_config(store, config);
    registry.init().await.context("failed to initialize store")?;

    let app = create_router(registry);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

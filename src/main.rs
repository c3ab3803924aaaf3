//! Memory Match backend binary entrypoint wiring REST routes and storage.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_config = AppConfig::load();
    let app_state = AppState::new(app_config);

    spawn_storage(app_state.clone());
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Spawn the supervisor that connects to MongoDB and keeps the connection
/// healthy, flipping degraded mode while the store is unreachable.
#[cfg(feature = "mongo-store")]
fn spawn_storage(state: SharedState) {
    use std::sync::Arc;

    use dao::mongodb::{MongoMatchStore, config::MongoConfig};
    use dao::storage::StorageError;
    use dao::store::MatchStore;

    tokio::spawn(services::storage_supervisor::run(state, || async {
        let config = MongoConfig::from_env().await.map_err(StorageError::from)?;
        let store = MongoMatchStore::connect(config)
            .await
            .map_err(StorageError::from)?;
        Ok(Arc::new(store) as Arc<dyn MatchStore>)
    }));
}

/// Without the Mongo feature the server runs on volatile in-process storage.
#[cfg(not(feature = "mongo-store"))]
fn spawn_storage(state: SharedState) {
    use std::sync::Arc;

    use dao::memory::MemoryMatchStore;

    tokio::spawn(async move {
        tracing::warn!("built without mongo-store; records are kept in process memory only");
        state
            .install_store(Arc::new(MemoryMatchStore::new()))
            .await;
    });
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

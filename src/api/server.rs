use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::{
    services::{create, destroy, health, list, seed, show, update},
    state::{AppState, ResourceState},
};
use crate::config::{Config, ValidationError};
use crate::resource::{RegistryError, ResourceHandler, SchemaRegistry};
use crate::storage::{Storage, StoreError};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum MountError {
    #[error(transparent)]
    InvalidConfig(#[from] ValidationError),
    #[error("resource '{resource}': {source}")]
    UnknownSchema {
        resource: String,
        #[source]
        source: RegistryError,
    },
    #[error("resource '{resource}': {source}")]
    Storage {
        resource: String,
        #[source]
        source: StoreError,
    },
}

/// Open storage, serve until a shutdown signal, then close storage
pub async fn run(config: Config) -> Result<(), AnyError> {
    info!(backend = ?config.storage.backend, path = %config.storage.path.display(), "Opening storage");
    let storage = Storage::open(&config.storage)
        .map_err(|e| format!("Failed to open storage: {}", e))?;

    let registry = SchemaRegistry::with_defaults();
    let address = config.server.bind_addr;

    let state = AppState::new(config, storage.clone());
    let app = build_router(state, &registry)?;

    let listener = TcpListener::bind(address).await?;
    info!(%address, "fruitbox API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Closing storage");
    storage
        .close()
        .map_err(|e| format!("Failed to close storage: {}", e))?;

    Ok(())
}

/// Build the application router: `/health` plus one nested router per
/// configured resource
///
/// Invalid mount paths fail with [`MountError::InvalidConfig`] before any
/// route is nested.
pub fn build_router(state: AppState, registry: &SchemaRegistry) -> Result<Router, MountError> {
    state.config.validate()?;

    let mut app = Router::new().route("/health", get(health));

    for (name, mount) in &state.config.resources {
        let entry = registry
            .get(&mount.schema)
            .map_err(|source| MountError::UnknownSchema {
                resource: name.clone(),
                source,
            })?;

        let collection_name = mount.collection_name(name);
        let collection = state
            .storage
            .collection(collection_name)
            .map_err(|source| MountError::Storage {
                resource: name.clone(),
                source,
            })?;

        let resource_state = ResourceState {
            handler: Arc::new(ResourceHandler::new(name.clone(), entry.schema, collection)),
            fixtures: entry.fixtures,
            list_envelope: mount.list_envelope.clone(),
            max_payload_bytes: state.config.server.api.max_payload_bytes,
            metrics: state.metrics.clone(),
        };

        info!(resource = %name, path = %mount.path, collection = collection_name, "Mounting resource");
        app = app.nest(&mount.path, resource_router(resource_state));
    }

    Ok(app
        .with_state(state)
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

/// The six resource routes, relative to the mount path
fn resource_router<S>(state: ResourceState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list).post(create))
        .route("/seed", get(seed))
        .route("/{id}", get(show).put(update).delete(destroy))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

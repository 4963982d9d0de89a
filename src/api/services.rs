use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use super::{
    error::ApiError,
    models::HealthResponse,
    payload::Payload,
    state::{AppState, ResourceState},
};

/// Seed endpoint (GET {mount}/seed)
///
/// Inserts the schema's fixtures as new records on every call and returns
/// the created records.
pub async fn seed(State(state): State<ResourceState>) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .handler
        .seed(state.fixtures.to_vec())
        .await
        .map_err(|e| state.reject(e))?;

    state.metrics.records_seeded(records.len());

    Ok(Json(records))
}

/// Index endpoint (GET {mount})
///
/// Returns a bare array, or `{ "<key>": [...] }` when the mount is
/// configured with `list_envelope = "<key>"`.
pub async fn list(State(state): State<ResourceState>) -> Result<Response, ApiError> {
    let records = state.handler.list().await.map_err(|e| state.reject(e))?;

    let Some(key) = &state.list_envelope else {
        return Ok(Json(records).into_response());
    };

    let records = serde_json::to_value(records)
        .map_err(|e| ApiError::Internal(format!("Failed to encode records: {}", e)))?;
    let mut envelope = Map::new();
    envelope.insert(key.clone(), records);

    Ok(Json(Value::Object(envelope)).into_response())
}

/// Show endpoint (GET {mount}/{id})
pub async fn show(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.handler.get(&id).await.map_err(|e| state.reject(e))?;

    Ok(Json(record))
}

/// Create endpoint (POST {mount})
///
/// Accepts JSON or form bodies; returns 201 with the stored record.
pub async fn create(
    State(state): State<ResourceState>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .handler
        .create(payload)
        .await
        .map_err(|e| state.reject(e))?;

    state.metrics.record_created();

    Ok((StatusCode::CREATED, Json(record)))
}

/// Update endpoint (PUT {mount}/{id})
///
/// Only the fields present in the body are replaced.
pub async fn update(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .handler
        .update(&id, payload)
        .await
        .map_err(|e| state.reject(e))?;

    state.metrics.record_updated();

    Ok(Json(record))
}

/// Delete endpoint (DELETE {mount}/{id})
///
/// Returns the removed record.
pub async fn destroy(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .handler
        .delete(&id)
        .await
        .map_err(|e| state.reject(e))?;

    state.metrics.record_deleted();

    Ok(Json(record))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let resources = state
        .config
        .resources
        .iter()
        .map(|(name, resource)| (name.clone(), resource.path.clone()))
        .collect();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage.backend_name().to_string(),
        resources,
        metrics: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}

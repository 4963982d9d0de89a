use std::sync::Arc;

use super::error::ApiError;
use crate::config::Config;
use crate::observability::Metrics;
use crate::resource::{ResourceError, ResourceHandler};
use crate::storage::{Fields, Storage};

/// Application-wide state, used by `/health`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, storage: Storage) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// State of one mounted resource
#[derive(Clone)]
pub struct ResourceState {
    pub handler: Arc<ResourceHandler>,
    pub fixtures: Arc<Vec<Fields>>,
    pub list_envelope: Option<String>,
    pub max_payload_bytes: usize,
    pub metrics: Arc<Metrics>,
}

impl ResourceState {
    /// Convert a handler error, counting client-side rejections
    pub fn reject(&self, err: ResourceError) -> ApiError {
        let err = ApiError::from(err);
        if err.is_client_error() {
            self.metrics.request_rejected();
        }
        err
    }
}

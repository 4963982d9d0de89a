use std::sync::Arc;

use super::error::ResourceError;
use super::schema::Schema;
use crate::storage::{DocumentId, DocumentStore, Fields, Record};

/// Generic CRUD operations for one resource
///
/// Payloads are normalized through the schema before they reach the store,
/// so a validation failure never causes a write. Storage errors propagate
/// unchanged.
#[derive(Clone)]
pub struct ResourceHandler {
    name: String,
    schema: Arc<Schema>,
    store: Arc<dyn DocumentStore>,
}

impl ResourceHandler {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            name: name.into(),
            schema,
            store,
        }
    }

    /// Insert every fixture as a new record
    pub async fn seed(&self, fixtures: Vec<Fields>) -> Result<Vec<Record>, ResourceError> {
        let documents = fixtures
            .into_iter()
            .map(|fixture| self.schema.normalize_create(fixture))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.store.insert_many(documents).await?)
    }

    pub async fn list(&self) -> Result<Vec<Record>, ResourceError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Record, ResourceError> {
        let id: DocumentId = id.parse()?;
        self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn create(&self, payload: Fields) -> Result<Record, ResourceError> {
        let document = self.schema.normalize_create(payload)?;
        Ok(self.store.insert_one(document).await?)
    }

    /// Replace the fields present in `payload`; others are left untouched
    pub async fn update(&self, id: &str, payload: Fields) -> Result<Record, ResourceError> {
        let id: DocumentId = id.parse()?;
        let fields = self.schema.normalize_update(payload)?;
        self.store
            .find_by_id_and_update(&id, fields)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Remove the record and return it
    pub async fn delete(&self, id: &str) -> Result<Record, ResourceError> {
        let id: DocumentId = id.parse()?;
        self.store
            .find_by_id_and_delete(&id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    fn not_found(&self, id: DocumentId) -> ResourceError {
        ResourceError::NotFound {
            resource: self.name.clone(),
            id,
        }
    }
}

//! Document storage for resource records
//!
//! Every mounted resource talks to one *collection* through the
//! [`DocumentStore`] trait. Two backends implement it:
//!
//! - [`FjallStore`] - embedded LSM keyspace, one partition per collection
//! - [`MemoryStore`] - process-local maps, used by tests and `backend = "memory"`
//!
//! Both assign identifiers ([`DocumentId`], UUIDv7) and timestamps, so
//! records listed in key order come back in insertion order.
//!
//! The [`Storage`] handle is opened once at startup and closed after the
//! HTTP server has drained.

mod error;
mod fjall_store;
mod id;
mod keys;
mod memory_store;

pub use error::{Result, StoreError};
pub use fjall_store::{FjallCollection, FjallStore};
pub use id::{DocumentId, InvalidId};
pub use keys::is_valid_collection_name;
pub use memory_store::{MemoryCollection, MemoryStore};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

/// Field map of a document, without the store-managed keys
pub type Fields = Map<String, Value>;

/// Keys owned by the store; never taken from caller-supplied fields
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Build a fresh record with a new id and matching timestamps
    pub(crate) fn create(fields: Fields) -> Self {
        let now = timestamp();
        Self {
            id: DocumentId::generate(),
            fields: strip_reserved(fields),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the given fields and bump `updated_at`
    pub(crate) fn apply(&mut self, fields: Fields) {
        for (key, value) in strip_reserved(fields) {
            self.fields.insert(key, value);
        }
        self.updated_at = timestamp();
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

// Millisecond precision so JSON round trips compare equal.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_KEYS {
        fields.remove(key);
    }
    fields
}

/// Storage collaborator contract consumed by the resource handler
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert all documents as new records, preserving order
    async fn insert_many(&self, documents: Vec<Fields>) -> Result<Vec<Record>>;

    /// Every record in the collection, in key order
    async fn find_all(&self) -> Result<Vec<Record>>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Record>>;

    async fn insert_one(&self, document: Fields) -> Result<Record>;

    /// Merge `fields` into the record and return the updated version
    async fn find_by_id_and_update(
        &self,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Record>>;

    /// Remove the record and return what was removed
    async fn find_by_id_and_delete(&self, id: &DocumentId) -> Result<Option<Record>>;
}

/// Explicitly opened storage handle
#[derive(Clone)]
pub enum Storage {
    Fjall(FjallStore),
    Memory(MemoryStore),
}

impl Storage {
    /// Open the backend described by the configuration
    pub fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Fjall => Ok(Self::Fjall(FjallStore::open(&config.path)?)),
            StorageBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
        }
    }

    pub fn open_fjall<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::Fjall(FjallStore::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Handle to a named collection; the same name always shares data
    pub fn collection(&self, name: &str) -> Result<Arc<dyn DocumentStore>> {
        match self {
            Self::Fjall(store) => Ok(store.collection(name)?),
            Self::Memory(store) => Ok(store.collection(name)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Fjall(_) => "fjall",
            Self::Memory(_) => "memory",
        }
    }

    /// Flush pending writes; call once after the server stops
    pub fn close(&self) -> Result<()> {
        match self {
            Self::Fjall(store) => store.persist(),
            Self::Memory(_) => Ok(()),
        }
    }
}

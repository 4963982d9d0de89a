//! Process-local document storage

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use super::error::Result;
use super::{DocumentId, DocumentStore, Fields, Record};

/// In-memory storage for testing/development
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Arc<MemoryCollection>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the collection called `name`
    pub fn collection(&self, name: &str) -> Arc<MemoryCollection> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::default()))
            .clone()
    }
}

/// Records ordered by id, i.e. by creation time
#[derive(Debug, Default)]
pub struct MemoryCollection {
    records: RwLock<BTreeMap<DocumentId, Record>>,
}

#[async_trait]
impl DocumentStore for MemoryCollection {
    async fn insert_many(&self, documents: Vec<Fields>) -> Result<Vec<Record>> {
        let mut records = self.records.write().await;
        let created: Vec<Record> = documents.into_iter().map(Record::create).collect();
        for record in &created {
            records.insert(record.id, record.clone());
        }
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Record>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn insert_one(&self, document: Fields) -> Result<Record> {
        let record = Record::create(document);
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id_and_update(
        &self,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Record>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(id).map(|record| {
            record.apply(fields);
            record.clone()
        }))
    }

    async fn find_by_id_and_delete(&self, id: &DocumentId) -> Result<Option<Record>> {
        Ok(self.records.write().await.remove(id))
    }
}

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::{debug, info};

use super::error::{Result, StoreError};
use super::keys::{decode_record_key, encode_record_key, is_valid_collection_name, partition_name};
use super::{DocumentId, DocumentStore, Fields, Record};

/// Fjall-backed persistent document storage
#[derive(Clone)]
pub struct FjallStore {
    keyspace: Keyspace,
    collections: Arc<Mutex<HashMap<String, Arc<FjallCollection>>>>,
}

impl FjallStore {
    /// Open or create a Fjall store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening Fjall store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        info!("Fjall store opened successfully");
        Ok(Self {
            keyspace,
            collections: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Open (or reuse) the partition backing `name`
    pub fn collection(&self, name: &str) -> Result<Arc<FjallCollection>> {
        if !is_valid_collection_name(name) {
            return Err(StoreError::InvalidCollection(name.to_string()));
        }

        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = collections.get(name) {
            return Ok(existing.clone());
        }

        let partition = self
            .keyspace
            .open_partition(&partition_name(name), PartitionCreateOptions::default())?;
        debug!(collection = name, "Opened collection partition");

        let collection = Arc::new(FjallCollection {
            name: name.to_string(),
            keyspace: self.keyspace.clone(),
            partition,
            write_lock: tokio::sync::Mutex::new(()),
        });
        collections.insert(name.to_string(), collection.clone());
        Ok(collection)
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        info!("Fjall store persisted");
        Ok(())
    }
}

/// One collection, stored in its own partition
pub struct FjallCollection {
    name: String,
    keyspace: Keyspace,
    partition: PartitionHandle,
    write_lock: tokio::sync::Mutex<()>,
}

impl FjallCollection {
    fn read(&self, id: &DocumentId) -> Result<Option<Record>> {
        match self.partition.get(encode_record_key(id))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn write(&self, record: &Record) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        self.partition.insert(encode_record_key(&record.id), value)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FjallCollection {
    async fn insert_many(&self, documents: Vec<Fields>) -> Result<Vec<Record>> {
        let _guard = self.write_lock.lock().await;

        let records: Vec<Record> = documents.into_iter().map(Record::create).collect();

        let mut batch = self.keyspace.batch();
        for record in &records {
            let value = serde_json::to_vec(record)?;
            batch.insert(&self.partition, encode_record_key(&record.id), value);
        }
        batch.commit()?;

        debug!(collection = %self.name, count = records.len(), "Inserted records");
        Ok(records)
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            if decode_record_key(&key).is_none() {
                return Err(StoreError::CorruptKey(self.name.clone()));
            }
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Record>> {
        self.read(id)
    }

    async fn insert_one(&self, document: Fields) -> Result<Record> {
        let _guard = self.write_lock.lock().await;

        let record = Record::create(document);
        self.write(&record)?;

        debug!(collection = %self.name, id = %record.id, "Inserted record");
        Ok(record)
    }

    async fn find_by_id_and_update(
        &self,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<Option<Record>> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.read(id)? else {
            return Ok(None);
        };
        record.apply(fields);
        self.write(&record)?;

        debug!(collection = %self.name, %id, "Updated record");
        Ok(Some(record))
    }

    async fn find_by_id_and_delete(&self, id: &DocumentId) -> Result<Option<Record>> {
        let _guard = self.write_lock.lock().await;

        let Some(record) = self.read(id)? else {
            return Ok(None);
        };
        self.partition.remove(encode_record_key(id))?;

        debug!(collection = %self.name, %id, "Deleted record");
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn create_test_store() -> (FjallStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FjallStore::open(temp_dir.path().join("test_store")).unwrap();
        (store, temp_dir)
    }

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (store, _temp) = create_test_store();
        let fruits = store.collection("fruits").unwrap();

        let created = fruits
            .insert_one(fields(json!({"name": "kiwi", "color": "brown"})))
            .await
            .unwrap();

        let found = fruits.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_nonexistent() {
        let (store, _temp) = create_test_store();
        let fruits = store.collection("fruits").unwrap();

        let missing = DocumentId::generate();
        assert!(fruits.find_by_id(&missing).await.unwrap().is_none());
        assert!(
            fruits
                .find_by_id_and_update(&missing, fields(json!({"name": "x"})))
                .await
                .unwrap()
                .is_none()
        );
        assert!(fruits.find_by_id_and_delete(&missing).await.unwrap().is_none());
        assert!(fruits.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_many_and_find_all() {
        let (store, _temp) = create_test_store();
        let fruits = store.collection("fruits").unwrap();

        let created = fruits
            .insert_many(vec![
                fields(json!({"name": "grape"})),
                fields(json!({"name": "plum"})),
            ])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        let all = fruits.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        for record in &created {
            assert!(all.contains(record));
        }
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (store, _temp) = create_test_store();
        let fruits = store.collection("fruits").unwrap();

        let created = fruits
            .insert_one(fields(json!({"name": "kiwi", "color": "brown"})))
            .await
            .unwrap();

        let updated = fruits
            .find_by_id_and_update(&created.id, fields(json!({"color": "green"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.get("name"), Some(&json!("kiwi")));
        assert_eq!(updated.get("color"), Some(&json!("green")));
        assert_eq!(fruits.find_by_id(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let (store, _temp) = create_test_store();
        let fruits = store.collection("fruits").unwrap();

        let created = fruits
            .insert_one(fields(json!({"name": "kiwi"})))
            .await
            .unwrap();

        let removed = fruits.find_by_id_and_delete(&created.id).await.unwrap();
        assert_eq!(removed, Some(created.clone()));
        assert!(fruits.find_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_are_isolated_and_shared_by_name() {
        let (store, _temp) = create_test_store();
        let first = store.collection("fruits").unwrap();
        let same = store.collection("fruits").unwrap();
        let other = store.collection("basiccrud").unwrap();

        let created = first
            .insert_one(fields(json!({"name": "kiwi"})))
            .await
            .unwrap();

        assert_eq!(same.find_by_id(&created.id).await.unwrap(), Some(created));
        assert!(other.find_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_collection_name() {
        let (store, _temp) = create_test_store();
        assert!(matches!(
            store.collection("bad/name"),
            Err(StoreError::InvalidCollection(_))
        ));
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reopen");

        let created = {
            let store = FjallStore::open(&path).unwrap();
            let fruits = store.collection("fruits").unwrap();
            let created = fruits
                .insert_one(fields(json!({"name": "kiwi"})))
                .await
                .unwrap();
            store.persist().unwrap();
            created
        };

        let store = FjallStore::open(&path).unwrap();
        let fruits = store.collection("fruits").unwrap();
        assert_eq!(fruits.find_by_id(&created.id).await.unwrap(), Some(created));
    }
}

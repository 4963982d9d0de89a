use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::fruit;
use super::schema::Schema;
use crate::storage::Fields;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("schema not found: {0}")]
    NotFound(String),
}

/// A schema together with the fixtures its seed route inserts
#[derive(Clone, Debug)]
pub struct SchemaEntry {
    pub schema: Arc<Schema>,
    pub fixtures: Arc<Vec<Fields>>,
}

/// Registry mapping schema names to descriptors
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, SchemaEntry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, schema: Schema, fixtures: Vec<Fields>) {
        let name = schema.name().to_string();
        self.entries.insert(
            name,
            SchemaEntry {
                schema: Arc::new(schema),
                fixtures: Arc::new(fixtures),
            },
        );
    }

    pub fn get(&self, name: &str) -> Result<SchemaEntry, RegistryError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Create default registry with built-in schemas
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let fixtures = fruit::fixtures()
            .into_iter()
            .map(fruit::FruitDraft::into_fields)
            .collect();
        registry.register(fruit::schema(), fixtures);

        registry
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

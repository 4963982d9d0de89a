use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_resources")]
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            resources: default_resources(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub api: ApiLimits,
}

/// API request limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiLimits {
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api: ApiLimits::default(),
        }
    }
}

impl Default for ApiLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024 // 1 MB
}

/// Storage backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Fjall,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Keyspace directory (fjall only)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/fruitbox")
}

/// One mounted resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Base path the routes are nested under, e.g. "/api/fruits"
    pub path: String,
    /// Registered schema name
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Storage collection; defaults to the resource key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Wrap list responses as `{ "<key>": [...] }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_envelope: Option<String>,
}

impl ResourceConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            schema: default_schema(),
            collection: None,
            list_envelope: None,
        }
    }

    /// Collection name, falling back to the resource key
    pub fn collection_name<'a>(&'a self, resource: &'a str) -> &'a str {
        self.collection.as_deref().unwrap_or(resource)
    }
}

fn default_schema() -> String {
    crate::resource::fruit::SCHEMA_NAME.to_string()
}

fn default_resources() -> BTreeMap<String, ResourceConfig> {
    BTreeMap::from([("fruits".to_string(), ResourceConfig::new("/fruits"))])
}

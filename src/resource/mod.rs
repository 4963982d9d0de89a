//! Generic CRUD resources
//!
//! A resource is a schema bound to a storage collection. The
//! [`ResourceHandler`] provides seed, list, get, create, update and delete
//! for any schema; the HTTP layer mounts one handler per configured path.
//!
//! ## Key Components
//!
//! - [`Schema`] - field descriptors and payload normalization
//! - [`SchemaRegistry`] - named schemas with their seed fixtures
//! - [`ResourceHandler`] - the operations, delegating to a [`DocumentStore`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use fruitbox::resource::{ResourceHandler, SchemaRegistry};
//! use fruitbox::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let entry = SchemaRegistry::with_defaults().get("fruit")?;
//! let fruits = ResourceHandler::new("fruits", entry.schema, storage.collection("fruits")?);
//!
//! fruits.seed(entry.fixtures.to_vec()).await?;
//! let all = fruits.list().await?;
//! ```
//!
//! [`DocumentStore`]: crate::storage::DocumentStore

mod error;
pub mod fruit;
mod handler;
mod registry;
mod schema;

pub use error::{ResourceError, ValidationError};
pub use handler::ResourceHandler;
pub use registry::{RegistryError, SchemaEntry, SchemaRegistry};
pub use schema::{Field, FieldKind, Schema, checkbox};

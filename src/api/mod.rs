mod error;
pub mod models;
mod payload;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;

pub use error::ApiError;
pub use payload::Payload;
pub use server::{MountError, build_router, run};

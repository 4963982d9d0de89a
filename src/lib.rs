pub mod api;
pub mod config;
pub mod observability;
pub mod resource;
pub mod storage;

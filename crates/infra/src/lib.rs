//! Infrastructure layer: configuration, SQLite stores, external services.

pub mod config;
pub mod db;
pub mod external;
pub mod in_memory;

pub use config::{AppConfig, WxConfig};
pub use in_memory::InMemoryCatalogStore;

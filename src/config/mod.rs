pub mod ingest_config;
pub mod store_config;

pub use ingest_config::IngestConfig;
pub use store_config::StoreConfig;

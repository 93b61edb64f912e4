pub mod app_config;
pub mod memory_repo;
pub mod redis_repo;

pub use memory_repo::{CatalogSnapshot, InMemoryCatalog};
pub use redis_repo::RedisCatalog;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Invalid catalog: {0}")]
    Validation(String),
}

impl From<advert_core::CoreError> for StoreError {
    fn from(err: advert_core::CoreError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

use crate::errors::AppResult;
use async_trait::async_trait;
use serde_json::Value;

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// The external collection contract: one resource path per entity type,
/// JSON bodies, no authentication, pagination, or versioning. `patch` is
/// used exclusively for status reconciliation.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>>;
    async fn get(&self, collection: &str, id: u64) -> AppResult<Option<Value>>;
    async fn create(&self, collection: &str, record: &Value) -> AppResult<Value>;
    async fn replace(&self, collection: &str, id: u64, record: &Value) -> AppResult<Value>;
    async fn patch(&self, collection: &str, id: u64, partial: &Value) -> AppResult<Value>;
    async fn delete(&self, collection: &str, id: u64) -> AppResult<()>;
}

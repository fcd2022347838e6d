use crate::errors::{AppError, AppResult};
use crate::store::CollectionStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory store with the same contract as the REST backend. Backs the
/// test suites; seeded per collection with raw JSON records.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, collection: &str, records: Vec<Value>) {
        let mut collections = self.collections.lock().await;
        collections.insert(collection.to_string(), records);
    }
}

fn record_id(record: &Value) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: u64) -> AppResult<Option<Value>> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|record| record_id(record) == Some(id)))
            .cloned())
    }

    async fn create(&self, collection: &str, record: &Value) -> AppResult<Value> {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record.clone())
    }

    async fn replace(&self, collection: &str, id: u64, record: &Value) -> AppResult<Value> {
        let mut collections = self.collections.lock().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?;
        let slot = records
            .iter_mut()
            .find(|existing| record_id(existing) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn patch(&self, collection: &str, id: u64, partial: &Value) -> AppResult<Value> {
        let mut collections = self.collections.lock().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?;
        let record = records
            .iter_mut()
            .find(|existing| record_id(existing) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?;
        if let (Value::Object(target), Value::Object(updates)) = (&mut *record, partial) {
            for (key, value) in updates {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: u64) -> AppResult<()> {
        let mut collections = self.collections.lock().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", collection, id)))?;
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));
        if records.len() == before {
            return Err(AppError::NotFound(format!("{} {} not found", collection, id)));
        }
        Ok(())
    }
}

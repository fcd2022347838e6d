use crate::errors::{AppError, AppResult};
use crate::store::CollectionStore;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Production store: a REST collection backend reachable over HTTP.
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(error.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn item_url(&self, collection: &str, id: u64) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn decode(response: Response) -> AppResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!("{}: {}", status, body)));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl CollectionStore for RestStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let response = self.client.get(self.collection_url(collection)).send().await?;
        match Self::decode(response).await? {
            Value::Array(items) => Ok(items),
            other => Err(AppError::Http(format!(
                "expected a collection array from {}, got {}",
                collection, other
            ))),
        }
    }

    async fn get(&self, collection: &str, id: u64) -> AppResult<Option<Value>> {
        let response = self.client.get(self.item_url(collection, id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    async fn create(&self, collection: &str, record: &Value) -> AppResult<Value> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(record)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn replace(&self, collection: &str, id: u64, record: &Value) -> AppResult<Value> {
        let response = self
            .client
            .put(self.item_url(collection, id))
            .json(record)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn patch(&self, collection: &str, id: u64, partial: &Value) -> AppResult<Value> {
        let response = self
            .client
            .patch(self.item_url(collection, id))
            .json(partial)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, collection: &str, id: u64) -> AppResult<()> {
        let response = self.client.delete(self.item_url(collection, id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::RestStore;
    use std::time::Duration;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let store =
            RestStore::new("http://localhost:3000/", Duration::from_secs(5)).expect("client");
        assert_eq!(store.collection_url("clients"), "http://localhost:3000/clients");
        assert_eq!(store.item_url("clients", 4), "http://localhost:3000/clients/4");
    }
}

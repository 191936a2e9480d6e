use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// An object already in the bucket
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Public object storage for episode audio, manifests and feed documents
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Store `data` under `key`, replacing any previous object, and return
    /// its public URL
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, String>;

    /// Contents of `key`, or `None` when there is no such object
    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>, String>;

    /// Every object whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, String>;

    /// URL listeners use to fetch `key`
    fn public_url(&self, key: &str) -> String;
}

use super::error::FeedServiceError;
use super::model::FeedEntry;
use crate::infrastructure::repositories::FeedRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct FeedService {
    feed_repo: Arc<dyn FeedRepository>,
}

impl FeedService {
    pub fn new(feed_repo: Arc<dyn FeedRepository>) -> Self {
        Self { feed_repo }
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    /// Newest entry of the feed, or `None` when the feed is empty
    async fn fetch_latest(&self, feed_url: &str) -> Result<Option<FeedEntry>, FeedServiceError>;

    /// Every entry the feed currently carries, newest first
    async fn fetch_all(&self, feed_url: &str) -> Result<Vec<FeedEntry>, FeedServiceError>;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn fetch_latest(&self, feed_url: &str) -> Result<Option<FeedEntry>, FeedServiceError> {
        let entries = self.fetch_all(feed_url).await?;
        Ok(entries.into_iter().next())
    }

    async fn fetch_all(&self, feed_url: &str) -> Result<Vec<FeedEntry>, FeedServiceError> {
        self.validate_url(feed_url)?;

        let raw_entries = self
            .feed_repo
            .fetch_entries(feed_url)
            .await
            .map_err(FeedServiceError::Dependency)?;

        tracing::info!(
            feed_url = %feed_url,
            entry_count = raw_entries.len(),
            "Feed fetched"
        );

        Ok(raw_entries
            .into_iter()
            .map(|raw| FeedEntry::from_raw(raw, feed_url))
            .collect())
    }
}

impl FeedService {
    fn validate_url(&self, url: &str) -> Result<(), FeedServiceError> {
        if url.trim().is_empty() {
            return Err(FeedServiceError::Invalid("Feed URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FeedServiceError::Invalid(
                "Feed URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

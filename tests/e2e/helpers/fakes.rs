use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gospel_podcast_backend::domain::feed::RawFeedEntry;
use gospel_podcast_backend::domain::text::LanguageCode;
use gospel_podcast_backend::infrastructure::repositories::{
    FeedRepository, StorageRepository, StoredObject, TtsRepository,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Feeds served from memory, keyed by URL. Unknown URLs are empty feeds.
#[derive(Default)]
pub struct FakeFeedRepository {
    feeds: Mutex<HashMap<String, Vec<RawFeedEntry>>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeFeedRepository {
    pub fn set_entries(&self, feed_url: &str, entries: Vec<RawFeedEntry>) {
        self.feeds.lock().unwrap().insert(feed_url.to_string(), entries);
    }

    pub fn fail(&self, feed_url: &str) {
        self.failing.lock().unwrap().insert(feed_url.to_string());
    }
}

#[async_trait]
impl FeedRepository for FakeFeedRepository {
    async fn fetch_entries(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>, String> {
        if self.failing.lock().unwrap().contains(feed_url) {
            return Err(format!("connection refused: {}", feed_url));
        }
        Ok(self
            .feeds
            .lock()
            .unwrap()
            .get(feed_url)
            .cloned()
            .unwrap_or_default())
    }
}

/// "Audio" is the spoken text wrapped in brackets, one call per piece
#[derive(Default)]
pub struct FakeTtsRepository {
    spoken: Mutex<Vec<(LanguageCode, String)>>,
}

impl FakeTtsRepository {
    pub fn spoken(&self) -> Vec<(LanguageCode, String)> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for FakeTtsRepository {
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        self.spoken.lock().unwrap().push((language, text.to_string()));
        Ok(format!("[{}]", text).into_bytes())
    }
}

struct MemoryObject {
    data: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Bucket kept in memory
#[derive(Default)]
pub struct MemoryStorageRepository {
    objects: Mutex<BTreeMap<String, MemoryObject>>,
}

pub const PUBLIC_BASE_URL: &str = "https://cdn.test";

impl MemoryStorageRepository {
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).map(|o| o.data.clone())
    }

    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).map(|data| String::from_utf8_lossy(&data).to_string())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Seed an object as if uploaded at `last_modified`
    pub fn put(&self, key: &str, data: Vec<u8>, last_modified: DateTime<Utc>) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MemoryObject {
                data,
                content_type: "audio/mpeg".to_string(),
                last_modified,
            },
        );
    }
}

#[async_trait]
impl StorageRepository for MemoryStorageRepository {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, String> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MemoryObject {
                data,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(self.public_url(key))
    }

    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        Ok(self.get(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, String> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| StoredObject {
                key: key.clone(),
                size: object.data.len() as u64,
                last_modified: object.last_modified,
            })
            .collect())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE_URL, key)
    }
}

use super::error::PodcastServiceError;
use super::model::{
    default_guid, episode_file_name, rfc2822_gmt, title_from_file_name, Episode, EpisodeManifest,
    PodcastCatalog, PodcastConfig,
};
use super::rss::render_feed;
use crate::domain::feed::{FeedEntry, FeedServiceApi};
use crate::domain::text::LanguageCode;
use crate::domain::tts::TtsServiceApi;
use crate::infrastructure::repositories::StorageRepository;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
const FEED_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
const MANIFEST_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Serialize)]
pub struct PublishedEpisode {
    pub language: LanguageCode,
    pub title: String,
    pub audio_url: String,
    pub feed_url: String,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryFailure {
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    pub language: LanguageCode,
    pub published: usize,
    pub errors: Vec<EntryFailure>,
    pub feed_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RebuildReport {
    pub language: LanguageCode,
    pub episodes: usize,
    pub feed_url: String,
}

pub struct PodcastService {
    catalog: Arc<PodcastCatalog>,
    feed_service: Arc<dyn FeedServiceApi>,
    tts_service: Arc<dyn TtsServiceApi>,
    storage_repo: Arc<dyn StorageRepository>,
}

impl PodcastService {
    pub fn new(
        catalog: Arc<PodcastCatalog>,
        feed_service: Arc<dyn FeedServiceApi>,
        tts_service: Arc<dyn TtsServiceApi>,
        storage_repo: Arc<dyn StorageRepository>,
    ) -> Self {
        Self {
            catalog,
            feed_service,
            tts_service,
            storage_repo,
        }
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    /// Languages with a configured podcast
    fn languages(&self) -> Vec<LanguageCode>;

    /// Turn the newest feed entry into an episode and republish the feed
    async fn publish_latest(&self, language: &str) -> Result<PublishedEpisode, PodcastServiceError>;

    /// Publish every entry the feed carries, oldest first so the newest
    /// ends up on top. One entry failing does not stop the rest.
    async fn publish_history(&self, language: &str) -> Result<HistoryReport, PodcastServiceError>;

    /// Regenerate the feed from the audio already in storage, keeping the
    /// `max_items` most recent files
    async fn rebuild_from_storage(
        &self,
        language: &str,
        max_items: usize,
    ) -> Result<RebuildReport, PodcastServiceError>;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    fn languages(&self) -> Vec<LanguageCode> {
        self.catalog.languages()
    }

    async fn publish_latest(&self, language: &str) -> Result<PublishedEpisode, PodcastServiceError> {
        let config = self.catalog.get(language)?;

        let entry = self
            .feed_service
            .fetch_latest(&config.feed_url)
            .await?
            .ok_or_else(|| PodcastServiceError::NoEntries(config.feed_url.clone()))?;

        let episode = self.produce_episode(config, &entry).await?;

        let mut manifest = self.load_manifest(config).await?;
        manifest.add(episode.clone());
        let feed_url = self.save_feed(config, &manifest).await?;

        tracing::info!(
            language = %config.language,
            title = %episode.title,
            audio_url = %episode.audio_url,
            "Episode published"
        );

        Ok(PublishedEpisode {
            language: config.language,
            title: episode.title,
            audio_url: episode.audio_url,
            feed_url,
            duration_seconds: episode.duration,
        })
    }

    async fn publish_history(&self, language: &str) -> Result<HistoryReport, PodcastServiceError> {
        let config = self.catalog.get(language)?;

        let entries = self.feed_service.fetch_all(&config.feed_url).await?;
        if entries.is_empty() {
            return Err(PodcastServiceError::NoEntries(config.feed_url.clone()));
        }

        let mut manifest = self.load_manifest(config).await?;
        let mut published = 0;
        let mut errors = Vec::new();

        for entry in entries.iter().rev() {
            match self.produce_episode(config, entry).await {
                Ok(episode) => {
                    manifest.add(episode);
                    published += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        language = %config.language,
                        title = %entry.title,
                        error = %e,
                        "Skipping entry"
                    );
                    errors.push(EntryFailure {
                        title: entry.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let feed_url = self.save_feed(config, &manifest).await?;

        tracing::info!(
            language = %config.language,
            published,
            failed = errors.len(),
            "History published"
        );

        Ok(HistoryReport {
            language: config.language,
            published,
            errors,
            feed_url,
        })
    }

    async fn rebuild_from_storage(
        &self,
        language: &str,
        max_items: usize,
    ) -> Result<RebuildReport, PodcastServiceError> {
        let config = self.catalog.get(language)?;

        let mut objects: Vec<_> = self
            .storage_repo
            .list(&config.audio_prefix())
            .await
            .map_err(PodcastServiceError::Upload)?
            .into_iter()
            .filter(|object| object.key.ends_with(".mp3"))
            .collect();
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        objects.truncate(max_items);

        let episodes = objects
            .into_iter()
            .map(|object| {
                let file_name = object.key.rsplit('/').next().unwrap_or(&object.key);
                let title = title_from_file_name(file_name);
                let audio_url = self.storage_repo.public_url(&object.key);
                // One guid per stored object; timestamps collide within a second
                Episode {
                    description: format!("Episode: {}", title),
                    title,
                    guid: audio_url.clone(),
                    audio_url,
                    pub_date: rfc2822_gmt(object.last_modified),
                    duration: 0,
                    length: object.size,
                }
            })
            .collect::<Vec<_>>();

        let manifest = EpisodeManifest { episodes };
        let feed_url = self.save_feed(config, &manifest).await?;

        tracing::info!(
            language = %config.language,
            episodes = manifest.episodes.len(),
            "Feed rebuilt from storage"
        );

        Ok(RebuildReport {
            language: config.language,
            episodes: manifest.episodes.len(),
            feed_url,
        })
    }
}

impl PodcastService {
    /// Synthesize and upload the audio for one entry
    async fn produce_episode(
        &self,
        config: &PodcastConfig,
        entry: &FeedEntry,
    ) -> Result<Episode, PodcastServiceError> {
        let now = Utc::now();
        let description = if entry.summary.trim().is_empty() {
            entry.title.clone()
        } else {
            entry.summary.clone()
        };
        let cache_key = entry.link.clone().unwrap_or_else(|| entry.title.clone());

        let audio = self
            .tts_service
            .synthesize_episode(&cache_key, &entry.title, &description, config.language.as_str())
            .await?;

        let key = config.audio_key(&episode_file_name(&entry.title, now));
        let length = audio.audio_data.len() as u64;
        let audio_url = self
            .storage_repo
            .upload(&key, audio.audio_data, AUDIO_CONTENT_TYPE)
            .await
            .map_err(PodcastServiceError::Upload)?;

        Ok(Episode {
            title: entry.title.clone(),
            description,
            audio_url,
            pub_date: entry.published.clone().unwrap_or_else(|| rfc2822_gmt(now)),
            guid: entry
                .link
                .clone()
                .unwrap_or_else(|| default_guid(&config.podcast_info.website, now)),
            duration: audio.duration_seconds,
            length,
        })
    }

    async fn load_manifest(&self, config: &PodcastConfig) -> Result<EpisodeManifest, PodcastServiceError> {
        let key = config.manifest_key();
        let Some(bytes) = self
            .storage_repo
            .download(&key)
            .await
            .map_err(PodcastServiceError::Upload)?
        else {
            tracing::debug!(key = %key, "No manifest yet, starting empty");
            return Ok(EpisodeManifest::default());
        };

        let manifest = EpisodeManifest::from_json(&bytes)
            .with_context(|| format!("Corrupt episode manifest at {}", key))?;
        Ok(manifest)
    }

    /// Store the manifest and the rendered feed, returning the feed's URL
    async fn save_feed(
        &self,
        config: &PodcastConfig,
        manifest: &EpisodeManifest,
    ) -> Result<String, PodcastServiceError> {
        let json = manifest
            .to_json()
            .map_err(|e| PodcastServiceError::Render(e.to_string()))?;
        self.storage_repo
            .upload(&config.manifest_key(), json, MANIFEST_CONTENT_TYPE)
            .await
            .map_err(PodcastServiceError::Upload)?;

        let xml = render_feed(config, &manifest.episodes);
        self.storage_repo
            .upload(&config.feed_key(), xml.into_bytes(), FEED_CONTENT_TYPE)
            .await
            .map_err(PodcastServiceError::Upload)
    }
}

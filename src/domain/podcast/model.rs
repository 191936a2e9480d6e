use crate::domain::text::{LanguageCode, UnsupportedLanguage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_SLUG_LEN: usize = 80;

/// Channel-level metadata shown by podcast apps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastInfo {
    pub title: String,
    pub description: String,
    pub website: String,
    pub author: String,
    pub email: String,
    pub cover_art: String,
    pub rss_url: String,
}

/// Everything needed to publish one language's podcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastConfig {
    pub feed_url: String,
    #[serde(default)]
    pub storage_prefix: String,
    pub language: LanguageCode,
    #[serde(default)]
    pub podcast_info: PodcastInfo,
}

impl PodcastConfig {
    /// Storage prefix, `gospel/<lang>` when none is configured
    pub fn prefix(&self) -> String {
        let prefix = self.storage_prefix.trim().trim_matches('/');
        if prefix.is_empty() {
            format!("gospel/{}", self.language)
        } else {
            prefix.to_string()
        }
    }

    pub fn audio_prefix(&self) -> String {
        format!("{}/podcast_audio/", self.prefix())
    }

    pub fn audio_key(&self, file_name: &str) -> String {
        format!("{}{}", self.audio_prefix(), file_name)
    }

    pub fn feed_key(&self) -> String {
        format!("{}/podcast_feed.xml", self.prefix())
    }

    pub fn manifest_key(&self) -> String {
        format!("{}/episodes.json", self.prefix())
    }
}

/// The configured podcasts, one per language
#[derive(Debug, Clone, Default)]
pub struct PodcastCatalog {
    configs: HashMap<LanguageCode, PodcastConfig>,
}

impl PodcastCatalog {
    pub fn new(configs: impl IntoIterator<Item = PodcastConfig>) -> Self {
        Self {
            configs: configs.into_iter().map(|c| (c.language, c)).collect(),
        }
    }

    /// Look a podcast up by language code
    pub fn get(&self, language: &str) -> Result<&PodcastConfig, UnsupportedLanguage> {
        let code: LanguageCode = language.parse()?;
        self.configs
            .get(&code)
            .ok_or_else(|| UnsupportedLanguage(code.to_string()))
    }

    /// Configured languages in their canonical order
    pub fn languages(&self) -> Vec<LanguageCode> {
        LanguageCode::ALL
            .into_iter()
            .filter(|language| self.configs.contains_key(language))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// A published episode as it appears in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: String,
    pub audio_url: String,
    pub pub_date: String,
    pub guid: String,
    /// Seconds, 0 when unknown
    #[serde(default)]
    pub duration: u64,
    /// Audio size in bytes
    #[serde(default)]
    pub length: u64,
}

/// Every episode of a podcast, newest first
///
/// Persisted next to the feed so each publish can regenerate the whole
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeManifest {
    pub episodes: Vec<Episode>,
}

impl EpisodeManifest {
    /// Add an episode at the top, or replace the one with the same guid
    pub fn add(&mut self, episode: Episode) {
        match self.episodes.iter_mut().find(|e| e.guid == episode.guid) {
            Some(existing) => *existing = episode,
            None => self.episodes.insert(0, episode),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// File-name-safe version of a title
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.is_empty() {
        "gospel".to_string()
    } else {
        slug
    }
}

pub fn episode_file_name(title: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.mp3", at.format("%Y%m%d_%H%M%S"), slugify(title))
}

/// Title recovered from a stored audio file name
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".mp3").unwrap_or(file_name);
    let is_timestamp = |stamp: &str| {
        stamp
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 8 { b == b'_' } else { b.is_ascii_digit() })
    };
    let title = match (stem.get(..15), stem.get(15..16), stem.get(16..)) {
        (Some(stamp), Some("_"), Some(rest)) if !rest.is_empty() && is_timestamp(stamp) => rest,
        _ => stem,
    };
    title.replace('-', " ")
}

pub fn rfc2822_gmt(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn default_guid(website: &str, at: DateTime<Utc>) -> String {
    format!("{}/episode/{}", website.trim_end_matches('/'), at.format("%Y%m%d%H%M%S"))
}

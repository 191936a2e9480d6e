use crate::domain::text::normalize_for_tts;
use serde::{Deserialize, Serialize};

/// An entry as it appears in the source feed, markup and all
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedEntry {
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
}

/// A feed entry whose text is ready for synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl FeedEntry {
    /// Normalize a raw entry. Line breaks are kept so the summary can still be
    /// segmented; the language comes from the feed URL.
    pub fn from_raw(raw: RawFeedEntry, feed_url: &str) -> Self {
        let title = normalize_for_tts(&raw.title, None, Some(feed_url), false);
        let summary_raw = raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .or(raw.description)
            .unwrap_or_default();
        let summary = normalize_for_tts(&summary_raw, None, Some(feed_url), false);

        Self {
            title,
            summary,
            link: raw.link.filter(|l| !l.trim().is_empty()),
            published: raw.published.filter(|p| !p.trim().is_empty()),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO 639-1 language codes the podcast is produced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "de")]
    German,
}

impl LanguageCode {
    /// Every supported language, in the order feed URLs are probed
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::Italian,
        LanguageCode::English,
        LanguageCode::Spanish,
        LanguageCode::French,
        LanguageCode::Portuguese,
        LanguageCode::German,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Italian => "it",
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::Portuguese => "pt",
            LanguageCode::German => "de",
        }
    }

    /// Parse a code, falling back to English for anything unknown.
    ///
    /// Used at the synthesis boundary, where some voice must always be picked.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or(LanguageCode::English)
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnsupportedLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim().to_lowercase();
        LanguageCode::ALL
            .into_iter()
            .find(|language| language.as_str() == code)
            .ok_or(UnsupportedLanguage(code))
    }
}

/// Work out which language a piece of feed text is in.
///
/// An explicit code wins when it is one we know. Otherwise the feed URL is
/// searched for a `/<code>/` path segment. Returns `None` when neither says
/// anything, in which case no language-specific processing is applied.
pub fn detect_language(explicit: Option<&str>, feed_url: Option<&str>) -> Option<LanguageCode> {
    if let Some(language) = explicit.and_then(|code| code.parse::<LanguageCode>().ok()) {
        return Some(language);
    }

    let url = feed_url.unwrap_or_default().to_lowercase();
    if url.is_empty() {
        return None;
    }

    LanguageCode::ALL
        .into_iter()
        .find(|language| url.contains(&format!("/{}/", language.as_str())))
}

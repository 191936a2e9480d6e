use super::error::TtsServiceError;
use crate::domain::text::{build_italian_liturgy_segments, normalize_for_tts, LanguageCode};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const CHARACTERS_PER_MINUTE: f32 = 1000.0;

/// Longest silence between liturgical parts (Polly's SSML break limit)
pub const MAX_SEGMENT_PAUSE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct EpisodeAudio {
    pub audio_data: Vec<u8>,
    pub language: LanguageCode,
    pub char_count: usize,
    pub segment_count: usize,
    pub duration_seconds: u64,
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    segment_pause: Duration,
    cache: Option<Cache<String, EpisodeAudio>>,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, segment_pause: Duration, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(50)
                    .time_to_idle(Duration::from_secs(24 * 60 * 60)) // a day, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        if segment_pause > MAX_SEGMENT_PAUSE {
            tracing::warn!(
                requested_ms = segment_pause.as_millis() as u64,
                max_ms = MAX_SEGMENT_PAUSE.as_millis() as u64,
                "Segment pause clamped"
            );
        }

        Self {
            tts_repo,
            segment_pause: segment_pause.min(MAX_SEGMENT_PAUSE),
            cache,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Render a feed entry as one audio file
    ///
    /// Italian readings are split into their liturgical parts and rendered
    /// with a pause between parts, the title read first on its own. Every
    /// other language is read as a single stream of `title` then
    /// `description`. Unknown language codes are read with the English voice.
    ///
    /// `cache_key` identifies the entry (usually its link) for the optional
    /// in-process cache.
    async fn synthesize_episode(
        &self,
        cache_key: &str,
        title: &str,
        description: &str,
        language: &str,
    ) -> Result<EpisodeAudio, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize_episode(
        &self,
        cache_key: &str,
        title: &str,
        description: &str,
        language: &str,
    ) -> Result<EpisodeAudio, TtsServiceError> {
        let language = LanguageCode::from_code_or_default(language);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(cache_key).await {
                tracing::info!(
                    cache_key = %cache_key,
                    cached_audio_size = cached.audio_data.len(),
                    cached_language = %cached.language,
                    "TTS cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        let pieces = self.speakable_pieces(title, description, language);
        if pieces.is_empty() {
            return Err(TtsServiceError::Invalid(
                "Nothing left to read after normalization".to_string(),
            ));
        }

        let char_count: usize = pieces.iter().map(|p| p.chars().count()).sum();
        tracing::info!(
            cache_key = %cache_key,
            language = %language,
            segment_count = pieces.len(),
            char_count,
            "Synthesizing episode"
        );

        let audio_data = if pieces.len() > 1 {
            self.tts_repo
                .synthesize_segments(&pieces, language, self.segment_pause)
                .await
        } else {
            self.tts_repo.synthesize(&pieces[0], language).await
        }
        .map_err(TtsServiceError::Dependency)?;

        let result = EpisodeAudio {
            audio_data,
            language,
            char_count,
            segment_count: pieces.len(),
            duration_seconds: self.estimate_duration(char_count, pieces.len()),
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key.to_string(), result.clone()).await;
            tracing::info!(
                cache_key = %cache_key,
                audio_size = result.audio_data.len(),
                "TTS result cached"
            );
        }

        Ok(result)
    }
}

impl TtsService {
    /// Normalized, non-empty pieces of text in reading order
    fn speakable_pieces(&self, title: &str, description: &str, language: LanguageCode) -> Vec<String> {
        let code = Some(language.as_str());
        let description = if description.trim().is_empty() { title } else { description };

        let segments = if language == LanguageCode::Italian {
            build_italian_liturgy_segments(description)
        } else {
            Vec::new()
        };

        let pieces: Vec<String> = if segments.len() > 1 && !self.segment_pause.is_zero() {
            std::iter::once(title.to_string())
                .chain(segments)
                .map(|piece| normalize_for_tts(&piece, code, None, true))
                .collect()
        } else {
            let text = format!("{}\n{}", title, description);
            vec![normalize_for_tts(&text, code, None, true)]
        };

        pieces.into_iter().filter(|p| !p.is_empty()).collect()
    }

    fn estimate_duration(&self, char_count: usize, segment_count: usize) -> u64 {
        let rate = self.tts_repo.speech_rate().factor();
        let speech_seconds = char_count as f32 / (CHARACTERS_PER_MINUTE * rate) * 60.0;
        let pauses = self.segment_pause.as_secs_f32() * segment_count.saturating_sub(1) as f32;
        (speech_seconds + pauses).round() as u64
    }
}

use crate::domain::text::LanguageCode;
use crate::domain::tts::SpeechRate;
use async_trait::async_trait;
use std::time::Duration;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly today).
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech for a given language
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Arguments
    /// * `text` - Normalized text to synthesize (no markup, one line)
    /// * `language` - The target language for synthesis
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String>;

    /// Synthesize several segments into one stream, `pause` apart
    ///
    /// The default renders each segment and concatenates the audio without
    /// any silence; providers that can produce silence override it.
    async fn synthesize_segments(
        &self,
        segments: &[String],
        language: LanguageCode,
        _pause: Duration,
    ) -> Result<Vec<u8>, String> {
        let mut merged = Vec::new();
        for segment in segments {
            merged.extend(self.synthesize(segment, language).await?);
        }
        Ok(merged)
    }

    /// Rate the provider reads at, used to estimate episode length
    fn speech_rate(&self) -> SpeechRate {
        SpeechRate::Normal
    }
}

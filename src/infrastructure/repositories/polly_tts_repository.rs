use super::tts_repository::TtsRepository;
use crate::domain::text::LanguageCode;
use crate::domain::tts::SpeechRate;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use quick_xml::escape::escape;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;:]+\s+").expect("SENTENCE_END regex should compile"));

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    rate: SpeechRate,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, rate: SpeechRate) -> Self {
        Self { polly_client, rate }
    }

    /// Select the neural Polly voice for a language
    fn voice_for_language(language: LanguageCode) -> &'static str {
        match language {
            LanguageCode::English => "Joanna",
            LanguageCode::Spanish => "Lupe",
            LanguageCode::French => "Lea",
            LanguageCode::German => "Vicki",
            LanguageCode::Italian => "Bianca",
            LanguageCode::Portuguese => "Ines",
        }
    }

    /// SSML document holding nothing but a pause
    ///
    /// Polly caps a break at 10 s; callers clamp the pause before it gets here.
    fn silence_ssml(pause: Duration) -> String {
        format!(r#"<speak><break time="{}ms"/></speak>"#, pause.as_millis())
    }

    /// Request body and type for one batch at the configured rate
    fn batch_request(&self, batch: &str) -> (String, TextType) {
        match self.rate.prosody_rate() {
            Some(rate) => (
                format!(
                    r#"<speak><prosody rate="{}">{}</prosody></speak>"#,
                    rate,
                    escape(batch)
                ),
                TextType::Ssml,
            ),
            None => (batch.to_string(), TextType::Text),
        }
    }

    async fn call_polly(
        &self,
        text: &str,
        text_type: TextType,
        language: LanguageCode,
    ) -> Result<Vec<u8>, String> {
        let voice_name = Self::voice_for_language(language);
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;
        let preview: String = text.chars().take(200).collect();

        tracing::info!(
            language = %language,
            voice = voice_name,
            text_type = ?text_type,
            text_length = text.len(),
            text_preview = %preview,
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .text_type(text_type)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    language = %language,
                    voice = voice_name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {:?}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(audio_size = audio_bytes.len(), "Audio stream collected");

        Ok(audio_bytes)
    }

    async fn synthesize_batches(
        &self,
        batches: &[String],
        language: LanguageCode,
    ) -> Result<Vec<u8>, String> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let (request, text_type) = self.batch_request(batch);
            let audio_data = self.call_polly(&request, text_type, language).await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                batch_size = batch.len(),
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }
}

/// Split text into batches that end on sentence boundaries
///
/// Each batch is at most `MAX_BATCH_SIZE` bytes. A run of text with no
/// boundary that is still too long is cut on character boundaries.
fn split_into_batches(text: &str) -> Vec<String> {
    if text.len() <= MAX_BATCH_SIZE {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    let sentence_ends = SENTENCE_END
        .find_iter(text)
        .map(|m| m.end())
        .chain(std::iter::once(text.len()));

    for end in sentence_ends {
        if end <= last_end {
            continue;
        }
        let sentence = &text[last_end..end];
        last_end = end;

        if !current.is_empty() && current.len() + sentence.len() > MAX_BATCH_SIZE {
            batches.push(current.trim().to_string());
            current.clear();
        }

        if sentence.len() > MAX_BATCH_SIZE {
            push_hard_split(&mut batches, sentence);
        } else {
            current.push_str(sentence);
        }
    }

    if !current.trim().is_empty() {
        batches.push(current.trim().to_string());
    }

    batches
}

fn push_hard_split(batches: &mut Vec<String>, text: &str) {
    let mut chunk = String::with_capacity(MAX_BATCH_SIZE);
    for c in text.chars() {
        if chunk.len() + c.len_utf8() > MAX_BATCH_SIZE {
            batches.push(std::mem::take(&mut chunk));
        }
        chunk.push(c);
    }
    if !chunk.trim().is_empty() {
        batches.push(chunk);
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, language: LanguageCode) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let batches = split_into_batches(text);
        let audio_data = self.synthesize_batches(&batches, language).await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            latency_ms = duration.as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    /// MP3 frames concatenate cleanly, so the pause is rendered once and
    /// spliced between segments.
    async fn synthesize_segments(
        &self,
        segments: &[String],
        language: LanguageCode,
        pause: Duration,
    ) -> Result<Vec<u8>, String> {
        let silence = if segments.len() > 1 && !pause.is_zero() {
            self.call_polly(&Self::silence_ssml(pause), TextType::Ssml, language)
                .await?
        } else {
            Vec::new()
        };

        let mut merged = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                merged.extend_from_slice(&silence);
            }
            merged.extend(self.synthesize(segment, language).await?);
        }

        tracing::info!(
            segment_count = segments.len(),
            pause_ms = pause.as_millis() as u64,
            audio_size_bytes = merged.len(),
            "Segments synthesized with pauses"
        );

        Ok(merged)
    }

    fn speech_rate(&self) -> SpeechRate {
        self.rate
    }
}

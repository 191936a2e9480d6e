pub mod error;
pub mod rate;
pub mod service;

pub use error::TtsServiceError;
pub use rate::{SpeechRate, UnsupportedSpeechRate};
pub use service::{EpisodeAudio, TtsService, TtsServiceApi, MAX_SEGMENT_PAUSE};

use crate::domain::feed::FeedServiceError;
use crate::domain::text::UnsupportedLanguage;
use crate::domain::tts::TtsServiceError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PodcastServiceError {
    #[error("no podcast configured for language: {0}")]
    UnsupportedLanguage(String),
    #[error("no entries in feed: {0}")]
    NoEntries(String),
    #[error("feed error: {0}")]
    Feed(String),
    #[error("synthesis error: {0}")]
    Synthesis(String),
    #[error("storage error: {0}")]
    Upload(String),
    #[error("render error: {0}")]
    Render(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UnsupportedLanguage> for PodcastServiceError {
    fn from(err: UnsupportedLanguage) -> Self {
        PodcastServiceError::UnsupportedLanguage(err.0)
    }
}

impl From<FeedServiceError> for PodcastServiceError {
    fn from(err: FeedServiceError) -> Self {
        PodcastServiceError::Feed(err.to_string())
    }
}

impl From<TtsServiceError> for PodcastServiceError {
    fn from(err: TtsServiceError) -> Self {
        PodcastServiceError::Synthesis(err.to_string())
    }
}

impl From<PodcastServiceError> for AppError {
    fn from(err: PodcastServiceError) -> Self {
        match err {
            PodcastServiceError::UnsupportedLanguage(_) => AppError::BadRequest(err.to_string()),
            PodcastServiceError::NoEntries(_) => AppError::NotFound(err.to_string()),
            PodcastServiceError::Feed(_)
            | PodcastServiceError::Synthesis(_)
            | PodcastServiceError::Upload(_) => AppError::ExternalService(err.to_string()),
            PodcastServiceError::Render(_) | PodcastServiceError::Other(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

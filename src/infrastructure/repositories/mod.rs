pub mod feed_repository;
pub mod polly_tts_repository;
pub mod s3_storage_repository;
pub mod storage_repository;
pub mod tts_repository;

pub use feed_repository::{parse_feed, FeedRepository, HttpFeedRepository};
pub use polly_tts_repository::PollyTtsRepository;
pub use s3_storage_repository::S3StorageRepository;
pub use storage_repository::{StorageRepository, StoredObject};
pub use tts_repository::TtsRepository;

pub mod error;
pub mod model;
pub mod service;

pub use error::FeedServiceError;
pub use model::{FeedEntry, RawFeedEntry};
pub use service::{FeedService, FeedServiceApi};

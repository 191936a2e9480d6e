pub mod error;
pub mod model;
pub mod rss;
pub mod service;

pub use error::PodcastServiceError;
pub use model::{Episode, EpisodeManifest, PodcastCatalog, PodcastConfig, PodcastInfo};
pub use rss::{render_feed, sanitize};
pub use service::{
    EntryFailure, HistoryReport, PodcastService, PodcastServiceApi, PublishedEpisode, RebuildReport,
};

use gospel_podcast_backend::controllers::publish::PublishController;
use gospel_podcast_backend::domain::feed::{FeedService, RawFeedEntry};
use gospel_podcast_backend::domain::podcast::{
    PodcastCatalog, PodcastConfig, PodcastInfo, PodcastService, PodcastServiceApi,
};
use gospel_podcast_backend::domain::text::LanguageCode;
use gospel_podcast_backend::domain::tts::TtsService;
use gospel_podcast_backend::infrastructure::http::create_router;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;
pub mod fakes;

use api_client::TestClient;
use fakes::{FakeFeedRepository, FakeTtsRepository, MemoryStorageRepository};

pub const ITALIAN_FEED: &str = "https://feeds.test/it/vangelo.xml";
pub const ENGLISH_FEED: &str = "https://feeds.test/en/gospel.xml";
pub const REBUILD_MAX_ITEMS: usize = 10;

/// A running server backed by in-memory feeds, speech and storage.
///
/// The Italian and English podcasts are configured; nothing else is.
pub struct TestContext {
    pub client: TestClient,
    pub feeds: Arc<FakeFeedRepository>,
    pub tts: Arc<FakeTtsRepository>,
    pub storage: Arc<MemoryStorageRepository>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let feeds = Arc::new(FakeFeedRepository::default());
            let tts = Arc::new(FakeTtsRepository::default());
            let storage = Arc::new(MemoryStorageRepository::default());

            let catalog = PodcastCatalog::new(vec![
                podcast_config(LanguageCode::Italian, ITALIAN_FEED, "Vangelo del giorno"),
                podcast_config(LanguageCode::English, ENGLISH_FEED, "Daily Gospel"),
            ]);

            let feed_service = Arc::new(FeedService::new(feeds.clone()));
            let tts_service = Arc::new(TtsService::new(tts.clone(), Duration::from_secs(5), false));
            let podcast_service: Arc<dyn PodcastServiceApi> = Arc::new(PodcastService::new(
                Arc::new(catalog),
                feed_service,
                tts_service,
                storage.clone(),
            ));
            let publish_controller = Arc::new(PublishController::new(
                podcast_service.clone(),
                REBUILD_MAX_ITEMS,
            ));

            let app = create_router(podcast_service, publish_controller);

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

            Self {
                client: TestClient::new(&base_url),
                feeds,
                tts,
                storage,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

fn podcast_config(language: LanguageCode, feed_url: &str, title: &str) -> PodcastConfig {
    PodcastConfig {
        feed_url: feed_url.to_string(),
        storage_prefix: format!("gospel/{}", language),
        language,
        podcast_info: PodcastInfo {
            title: title.to_string(),
            website: format!("https://gospel.test/{}", language),
            email: "podcast@gospel.test".to_string(),
            ..PodcastInfo::default()
        },
    }
}

/// A day's Italian liturgy as the feed publishes it
pub fn italian_entry(day: u32) -> RawFeedEntry {
    RawFeedEntry {
        title: format!("Vangelo del {} gennaio", day),
        summary: Some(
            "<p>Prima lettura<br>Dal libro del profeta Is 1, 1<br>Così dice il Signore.</p>\
             <p>Salmo responsoriale<br>R. Il Signore è il mio pastore.</p>\
             <p>Dal Vangelo secondo Gv 10, 11<br>Io sono il buon pastore.</p>\
             <p>Il pastore dà la vita (Papa Francesco)</p>"
                .to_string(),
        ),
        description: None,
        link: Some(format!("https://gospel.test/it/2024/01/{:02}", day)),
        published: Some(format!("Tue, {:02} Jan 2024 00:00:00 GMT", day)),
    }
}

pub fn english_entry(day: u32) -> RawFeedEntry {
    RawFeedEntry {
        title: format!("Gospel of January {}", day),
        summary: None,
        description: Some("<p>A reading from Jn 1, 1.</p>".to_string()),
        link: Some(format!("https://gospel.test/en/2024/01/{:02}", day)),
        published: None,
    }
}

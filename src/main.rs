use gospel_podcast_backend::controllers::publish::PublishController;
use gospel_podcast_backend::domain::feed::FeedService;
use gospel_podcast_backend::domain::podcast::{PodcastService, PodcastServiceApi};
use gospel_podcast_backend::domain::tts::TtsService;
use gospel_podcast_backend::infrastructure::config::{init_logging, load_podcast_catalog, Config};
use gospel_podcast_backend::infrastructure::http::{create_router, start_http_server};
use gospel_podcast_backend::infrastructure::repositories::{
    HttpFeedRepository, PollyTtsRepository, S3StorageRepository,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    init_logging(&config.log_format);

    tracing::info!(
        "Starting Gospel Podcast Backend on {}:{}",
        config.host,
        config.port
    );

    let catalog = load_podcast_catalog(&config.podcast_config_dir, config.podcast_email.as_deref())?;
    if catalog.is_empty() {
        tracing::warn!(
            dir = %config.podcast_config_dir.display(),
            "No podcast configs found, publishing endpoints will reject every language"
        );
    }

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    tracing::info!(
        has_access_key_id = has_access_key,
        has_secret_access_key = has_secret_key,
        "AWS credentials environment check"
    );

    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let feed_repo = Arc::new(HttpFeedRepository::new(config.feed_timeout())?);
    let tts_repo = Arc::new(PollyTtsRepository::new(polly_client, config.speech_rate));
    let storage_repo = Arc::new(S3StorageRepository::new(
        s3_client,
        config.storage_bucket.clone(),
        &config.aws_region,
        config.storage_public_base_url.clone(),
    ));

    // 2. Services
    let feed_service = Arc::new(FeedService::new(feed_repo));
    let tts_service = Arc::new(TtsService::new(
        tts_repo,
        config.segment_pause(),
        config.tts_cache_enabled,
    ));
    let podcast_service: Arc<dyn PodcastServiceApi> = Arc::new(PodcastService::new(
        Arc::new(catalog),
        feed_service,
        tts_service,
        storage_repo,
    ));

    // 3. Controllers
    let publish_controller = Arc::new(PublishController::new(
        podcast_service.clone(),
        config.rebuild_max_items,
    ));

    let app = create_router(podcast_service, publish_controller);
    start_http_server(&config, app).await?;

    Ok(())
}

pub mod podcasts;

pub use podcasts::load_podcast_catalog;

use crate::domain::tts::SpeechRate;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "gospel_podcast_backend=debug,tower_http=debug";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub storage_bucket: String,
    pub storage_public_base_url: Option<String>,
    // Podcasts
    pub podcast_config_dir: PathBuf,
    pub podcast_email: Option<String>,
    pub segment_pause_seconds: u64,
    pub rebuild_max_items: usize,
    pub feed_timeout_seconds: u64,
    pub speech_rate: SpeechRate,
    // TTS Cache
    pub tts_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            environment: match env::var("ENVIRONMENT").unwrap_or_default().as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").unwrap_or_default().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            storage_bucket: env::var("STORAGE_BUCKET")?,
            storage_public_base_url: optional("STORAGE_PUBLIC_BASE_URL"),
            podcast_config_dir: env::var("PODCAST_CONFIG_DIR")
                .unwrap_or_else(|_| "configs".to_string())
                .into(),
            podcast_email: optional("PODCAST_EMAIL"),
            segment_pause_seconds: env::var("SEGMENT_PAUSE_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            rebuild_max_items: env::var("REBUILD_MAX_ITEMS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            feed_timeout_seconds: env::var("FEED_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            speech_rate: env::var("SPEECH_RATE")
                .unwrap_or_else(|_| "normal".to_string())
                .parse()?,
            tts_cache_enabled: env::var("TTS_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn segment_pause(&self) -> Duration {
        Duration::from_secs(self.segment_pause_seconds)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_seconds)
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_logging(log_format: &LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if *log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

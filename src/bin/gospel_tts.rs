use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use gospel_podcast_backend::domain::feed::{FeedService, FeedServiceApi};
use gospel_podcast_backend::domain::podcast::{
    model::slugify, PodcastCatalog, PodcastService, PodcastServiceApi,
};
use gospel_podcast_backend::domain::text::{
    build_italian_liturgy_segments, normalize_for_tts, LanguageCode,
};
use gospel_podcast_backend::domain::tts::{SpeechRate, TtsService, TtsServiceApi};
use gospel_podcast_backend::infrastructure::config::{load_podcast_catalog, Config};
use gospel_podcast_backend::infrastructure::repositories::{
    HttpFeedRepository, PollyTtsRepository, S3StorageRepository,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TITLE: &str = "Daily Gospel";

#[derive(Parser, Debug)]
#[command(name = "gospel-tts")]
#[command(about = "Daily Gospel text and audio tools")]
#[command(version)]
struct Args {
    /// Directory holding the per-language podcast configs
    #[arg(long, env = "PODCAST_CONFIG_DIR", default_value = "configs", global = true)]
    config_dir: PathBuf,

    /// Silence between liturgical parts, in seconds
    #[arg(long, env = "SEGMENT_PAUSE_SECONDS", default_value_t = 5, global = true)]
    pause_seconds: u64,

    /// Feed request timeout, in seconds
    #[arg(long, env = "FEED_TIMEOUT_SECONDS", default_value_t = 20, global = true)]
    feed_timeout_seconds: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the speech-ready version of some text
    Normalize {
        /// Text to normalize; read from stdin when omitted
        text: Option<String>,

        /// Language code driving abbreviation expansion and smoothing
        #[arg(long)]
        lang: Option<String>,

        /// Feed URL to take the language from when --lang is not given
        #[arg(long)]
        feed_url: Option<String>,

        /// Join lines into a single one
        #[arg(long)]
        flatten: bool,
    },

    /// Print the spoken parts of an Italian liturgy description
    Segments {
        /// Description; read from stdin when omitted
        text: Option<String>,

        /// Print a JSON array instead of blank-line separated parts
        #[arg(long)]
        json: bool,
    },

    /// Render one episode to an MP3 file
    Synthesize {
        #[arg(long, default_value = "it")]
        lang: String,

        /// Read this text instead of the latest feed entry
        #[arg(long)]
        text: Option<String>,

        /// Output MP3 path
        #[arg(long)]
        out: PathBuf,

        /// Speaking rate: normal, slow or fast
        #[arg(long, default_value = "normal")]
        speed: SpeechRate,
    },

    /// Publish the latest episode and regenerate the podcast feed
    Publish {
        #[arg(long, default_value = "it")]
        lang: String,
    },

    /// Write one MP3 per language for manual upload
    GenerateAll {
        /// Comma-separated language codes, or `all`
        #[arg(long, default_value = "all")]
        langs: String,

        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Speaking rate: normal, slow or fast
        #[arg(long, default_value = "normal")]
        speed: SpeechRate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gospel_podcast_backend=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "Parsed CLI arguments");

    match &args.command {
        Command::Normalize {
            text,
            lang,
            feed_url,
            flatten,
        } => {
            let text = text_or_stdin(text.as_deref())?;
            println!(
                "{}",
                normalize_for_tts(&text, lang.as_deref(), feed_url.as_deref(), *flatten)
            );
        }
        Command::Segments { text, json } => {
            let text = text_or_stdin(text.as_deref())?;
            let segments = build_italian_liturgy_segments(&text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else {
                println!("{}", segments.join("\n\n"));
            }
        }
        Command::Synthesize {
            lang,
            text,
            out,
            speed,
        } => {
            let catalog = load_podcast_catalog(&args.config_dir, None)?;
            let tools = Tools::new(&args, *speed).await?;
            let (title, description) = match text {
                Some(text) => {
                    let title = catalog
                        .get(lang)
                        .map(|c| c.podcast_info.title.clone())
                        .ok()
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
                    (title, text.clone())
                }
                None => tools.latest_entry(&catalog, lang).await?,
            };
            let bytes = tools.render(lang, &title, &description).await?;
            write_file(out, &bytes)?;
            println!("Generated: {}", out.display());
        }
        Command::Publish { lang } => {
            let published = publish(&args, lang).await?;
            println!("{}", serde_json::to_string_pretty(&published)?);
        }
        Command::GenerateAll {
            langs,
            out_dir,
            speed,
        } => {
            let languages = parse_langs(langs)?;
            let catalog = load_podcast_catalog(&args.config_dir, None)?;
            let tools = Tools::new(&args, *speed).await?;
            std::fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            println!("Generating MP3 files in: {}", out_dir.display());

            let mut failures = 0;
            println!("\nGeneration summary:");
            for language in languages {
                match tools.generate(&catalog, language, out_dir).await {
                    Ok(path) => println!("  [OK] {}: {}", language, path.display()),
                    Err(e) => {
                        failures += 1;
                        println!("  [ERR] {}: {:#}", language, e);
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} language(s) failed", failures);
            }
        }
    }

    Ok(())
}

/// Feed and speech services wired against the real backends
struct Tools {
    feed_service: FeedService,
    tts_service: TtsService,
}

impl Tools {
    async fn new(args: &Args, speed: SpeechRate) -> Result<Self> {
        let aws_config = load_aws_config().await;
        let feed_repo = HttpFeedRepository::new(Duration::from_secs(args.feed_timeout_seconds))
            .map_err(anyhow::Error::msg)?;
        let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));

        Ok(Self {
            feed_service: FeedService::new(Arc::new(feed_repo)),
            tts_service: TtsService::new(
                Arc::new(PollyTtsRepository::new(polly_client, speed)),
                Duration::from_secs(args.pause_seconds),
                false,
            ),
        })
    }

    /// Title and description of the newest entry in a language's feed
    async fn latest_entry(&self, catalog: &PodcastCatalog, lang: &str) -> Result<(String, String)> {
        let config = catalog.get(lang)?;
        let entry = self
            .feed_service
            .fetch_latest(&config.feed_url)
            .await?
            .with_context(|| format!("No entry found in {}", config.feed_url))?;

        let description = if entry.summary.trim().is_empty() {
            entry.title.clone()
        } else {
            entry.summary
        };
        Ok((entry.title, description))
    }

    async fn render(&self, lang: &str, title: &str, description: &str) -> Result<Vec<u8>> {
        let cache_key = format!("{}:{}", lang, title);
        let audio = self
            .tts_service
            .synthesize_episode(&cache_key, title, description, lang)
            .await?;
        tracing::info!(
            language = %audio.language,
            segment_count = audio.segment_count,
            duration_seconds = audio.duration_seconds,
            "Audio rendered"
        );
        Ok(audio.audio_data)
    }

    async fn generate(
        &self,
        catalog: &PodcastCatalog,
        language: LanguageCode,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let (title, description) = self.latest_entry(catalog, language.as_str()).await?;
        let bytes = self.render(language.as_str(), &title, &description).await?;

        let file_name = format!(
            "{}_{}_{}.mp3",
            Utc::now().format("%Y%m%d"),
            language,
            slugify(&title)
        );
        let path = out_dir.join(file_name);
        write_file(&path, &bytes)?;
        Ok(path)
    }
}

async fn publish(args: &Args, lang: &str) -> Result<gospel_podcast_backend::domain::podcast::PublishedEpisode> {
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    let catalog = load_podcast_catalog(&args.config_dir, config.podcast_email.as_deref())?;
    let aws_config = load_aws_config().await;

    let storage_repo = Arc::new(S3StorageRepository::new(
        Arc::new(aws_sdk_s3::Client::new(&aws_config)),
        config.storage_bucket.clone(),
        &config.aws_region,
        config.storage_public_base_url.clone(),
    ));
    let tools = Tools::new(args, config.speech_rate).await?;

    let podcast_service = PodcastService::new(
        Arc::new(catalog),
        Arc::new(tools.feed_service),
        Arc::new(tools.tts_service),
        storage_repo,
    );

    Ok(podcast_service.publish_latest(lang).await?)
}

async fn load_aws_config() -> aws_config::SdkConfig {
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string());
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region))
        .load()
        .await
}

/// `all`, or a comma-separated list of supported codes
fn parse_langs(value: &str) -> Result<Vec<LanguageCode>> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(LanguageCode::ALL.to_vec());
    }

    let mut languages = Vec::new();
    let mut invalid = Vec::new();
    for code in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match code.parse::<LanguageCode>() {
            Ok(language) if !languages.contains(&language) => languages.push(language),
            Ok(_) => {}
            Err(_) => invalid.push(code),
        }
    }

    if !invalid.is_empty() {
        anyhow::bail!("Unsupported languages: {}", invalid.join(", "));
    }
    if languages.is_empty() {
        anyhow::bail!("No languages given");
    }
    Ok(languages)
}

fn text_or_stdin(text: Option<&str>) -> Result<String> {
    match text {
        Some(text) => Ok(text.to_string()),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

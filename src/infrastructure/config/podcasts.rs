use crate::domain::podcast::{PodcastCatalog, PodcastConfig};
use crate::domain::text::LanguageCode;
use anyhow::Context;
use std::path::Path;

/// Load `<dir>/<lang>.json` for every supported language that has one.
///
/// `email` replaces the contact address of every podcast when set. A file
/// whose `language` disagrees with its name is rejected.
pub fn load_podcast_catalog(dir: &Path, email: Option<&str>) -> anyhow::Result<PodcastCatalog> {
    let mut configs = Vec::new();

    for language in LanguageCode::ALL {
        let path = dir.join(format!("{}.json", language));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No podcast config for language");
            continue;
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: PodcastConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid podcast config {}", path.display()))?;

        if config.language != language {
            anyhow::bail!(
                "{} declares language {} but is named for {}",
                path.display(),
                config.language,
                language
            );
        }
        if let Some(email) = email {
            config.podcast_info.email = email.to_string();
        }

        configs.push(config);
    }

    let catalog = PodcastCatalog::new(configs);
    tracing::info!(
        dir = %dir.display(),
        languages = ?catalog.languages(),
        "Podcast configs loaded"
    );

    Ok(catalog)
}

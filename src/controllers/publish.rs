use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::{
        podcast::{HistoryReport, PodcastServiceApi, PublishedEpisode, RebuildReport},
        text::LanguageCode,
    },
    error::AppResult,
};

const DEFAULT_LANGUAGE: &str = "it";

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RebuildQuery {
    pub lang: Option<String>,
    pub max_items: Option<usize>,
}

/// Outcome for one language of a multi-language run
#[derive(Debug, Serialize)]
pub struct LanguageSummary<T> {
    pub language: LanguageCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MultiLanguageResponse<T> {
    pub results: Vec<LanguageSummary<T>>,
}

impl<T> MultiLanguageResponse<T> {
    /// 207 when some language failed, 200 otherwise
    fn status(&self) -> StatusCode {
        if self.results.iter().any(|r| !r.success) {
            StatusCode::MULTI_STATUS
        } else {
            StatusCode::OK
        }
    }
}

pub struct PublishController {
    podcast_service: Arc<dyn PodcastServiceApi>,
    rebuild_max_items: usize,
}

impl PublishController {
    pub fn new(podcast_service: Arc<dyn PodcastServiceApi>, rebuild_max_items: usize) -> Self {
        Self {
            podcast_service,
            rebuild_max_items,
        }
    }

    /// POST /publish?lang= - Publish today's episode for one language
    pub async fn publish(
        State(controller): State<Arc<PublishController>>,
        Query(query): Query<LanguageQuery>,
    ) -> AppResult<Json<PublishedEpisode>> {
        let language = query.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let episode = controller.podcast_service.publish_latest(language).await?;
        Ok(Json(episode))
    }

    /// POST /publish-all - Publish today's episode for every configured language
    pub async fn publish_all(
        State(controller): State<Arc<PublishController>>,
    ) -> (StatusCode, Json<MultiLanguageResponse<PublishedEpisode>>) {
        let mut results = Vec::new();

        for language in controller.podcast_service.languages() {
            let outcome = controller
                .podcast_service
                .publish_latest(language.as_str())
                .await;
            results.push(summarize(language, outcome));
        }

        let response = MultiLanguageResponse { results };
        (response.status(), Json(response))
    }

    /// POST /publish-history[?lang=] - Publish every entry still in the feed
    pub async fn publish_history(
        State(controller): State<Arc<PublishController>>,
        Query(query): Query<LanguageQuery>,
    ) -> AppResult<(StatusCode, Json<MultiLanguageResponse<HistoryReport>>)> {
        let mut results = Vec::new();

        match query.lang.as_deref() {
            Some(language) => {
                let report = controller.podcast_service.publish_history(language).await?;
                results.push(LanguageSummary {
                    language: report.language,
                    success: true,
                    result: Some(report),
                    error: None,
                });
            }
            None => {
                for language in controller.podcast_service.languages() {
                    let outcome = controller
                        .podcast_service
                        .publish_history(language.as_str())
                        .await;
                    results.push(summarize(language, outcome));
                }
            }
        }

        let response = MultiLanguageResponse { results };
        Ok((response.status(), Json(response)))
    }

    /// POST /rebuild?lang=&max_items= - Regenerate a feed from stored audio
    pub async fn rebuild(
        State(controller): State<Arc<PublishController>>,
        Query(query): Query<RebuildQuery>,
    ) -> AppResult<Json<RebuildReport>> {
        let language = query.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let max_items = query.max_items.unwrap_or(controller.rebuild_max_items);
        let report = controller
            .podcast_service
            .rebuild_from_storage(language, max_items)
            .await?;
        Ok(Json(report))
    }
}

fn summarize<T, E: std::fmt::Display>(
    language: LanguageCode,
    outcome: Result<T, E>,
) -> LanguageSummary<T> {
    match outcome {
        Ok(result) => LanguageSummary {
            language,
            success: true,
            result: Some(result),
            error: None,
        },
        Err(e) => {
            tracing::error!(language = %language, error = %e, "Language run failed");
            LanguageSummary {
                language,
                success: false,
                result: None,
                error: Some(e.to_string()),
            }
        }
    }
}

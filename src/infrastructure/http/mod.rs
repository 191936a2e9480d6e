use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    controllers::{health, publish::PublishController, text},
    domain::podcast::PodcastServiceApi,
    infrastructure::{config::Config, middleware::request_id_middleware},
};

/// Build the application router with every route and layer
pub fn create_router(
    podcast_service: Arc<dyn PodcastServiceApi>,
    publish_controller: Arc<PublishController>,
) -> Router {
    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(podcast_service);

    // Publishing routes, meant to be hit by a scheduler
    let publish_routes = Router::new()
        .route("/publish", post(PublishController::publish))
        .route("/publish-all", post(PublishController::publish_all))
        .route("/publish-history", post(PublishController::publish_history))
        .route("/rebuild", post(PublishController::rebuild))
        .with_state(publish_controller);

    // Stateless text tools
    let text_routes = Router::new()
        .route("/api/text/normalize", post(text::normalize))
        .route("/api/text/segments", post(text::segments));

    Router::new()
        .merge(health_routes)
        .merge(publish_routes)
        .merge(text_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on the configured address until the process stops
pub async fn start_http_server(config: &Config, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

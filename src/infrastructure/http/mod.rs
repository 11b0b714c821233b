use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::controllers::{health, tts::TtsController};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::{request_id_middleware, request_span};
use crate::infrastructure::repositories::AUDIO_ROUTE_PREFIX;

/// Build the application router.
///
/// Routes live at the root and again under `/api`; generated audio is served
/// read-only from `audio_dir` under `/audio`.
pub fn build_router(tts_controller: Arc<TtsController>, audio_dir: &Path) -> Router {
    let tts_routes = Router::new()
        .route("/tts/voices", get(TtsController::list_voices))
        .route("/tts/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller);

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .merge(tts_routes);

    Router::new()
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .nest_service(AUDIO_ROUTE_PREFIX, ServeDir::new(audio_dir))
        .layer(
            // Outermost first: the id must exist before the trace span is made
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(CorsLayer::permissive()),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(tts_controller, &config.audio_output_dir);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

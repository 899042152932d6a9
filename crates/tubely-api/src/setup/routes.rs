//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use utoipa::OpenApi;

/// Build the application router over `state`.
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;
    let max_video = state.config.max_video_size_bytes();
    let max_thumbnail = state.config.max_thumbnail_size_bytes();

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route(
            "/media/{bucket}/{*key}",
            get(handlers::media_file::serve_media),
        );

    // Auth is a route layer so it runs before path extraction and body reads,
    // while unknown paths still fall through to 404.
    let protected_routes = Router::new()
        .route("/videos", get(handlers::video_get::list_videos))
        .route("/videos/{video_id}", get(handlers::video_get::get_video))
        .route(
            "/videos/{video_id}/upload",
            post(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(max_video)),
        )
        .route(
            "/videos/{video_id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(max_thumbnail)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let app = public_routes
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            return Err(anyhow::anyhow!("CORS_ORIGINS cannot be '*' in production"));
        }
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

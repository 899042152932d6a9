//! Serves objects from the local backend behind its signed URLs.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tubely_core::AppError;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SignedMediaQuery {
    /// Unix timestamp after which the URL is rejected
    pub expires: i64,
    pub signature: String,
}

#[utoipa::path(
    get,
    path = "/media/{bucket}/{key}",
    tag = "media",
    params(
        ("bucket" = String, Path, description = "Bucket name"),
        ("key" = String, Path, description = "Object key"),
        SignedMediaQuery
    ),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 403, description = "Signature invalid or expired", body = ErrorResponse),
        (status = 404, description = "Object not found", body = ErrorResponse)
    )
)]
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedMediaQuery>,
) -> Result<Response, HttpAppError> {
    let local = state
        .local_media
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Media route is not enabled".to_string()))?;

    let object = local
        .open_signed(&bucket, &key, query.expires, &query.signature)
        .await?;

    tracing::debug!(bucket = %bucket, key = %key, size_bytes = object.size, "Serving signed media");

    Response::builder()
        .header(header::CONTENT_TYPE, object.content_type)
        .header(header::CONTENT_LENGTH, object.size)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(ReaderStream::new(object.file)))
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}

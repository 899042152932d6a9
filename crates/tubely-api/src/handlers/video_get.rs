use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::services::{signing, videos};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::VideoResponse;

#[utoipa::path(
    get,
    path = "/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found, URLs freshly signed", body = VideoResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Stored reference is malformed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %user.user_id, video_id = %video_id, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let record = videos::load_owned(state.videos.as_ref(), video_id, user.user_id).await?;
    let response = signing::sign_record(state.storage.as_ref(), record).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = [VideoResponse]),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let records = state.videos.list_videos_for_user(user.user_id).await?;

    let mut responses = Vec::with_capacity(records.len());
    for record in records {
        responses.push(signing::sign_record(state.storage.as_ref(), record).await?);
    }

    Ok(Json(responses))
}

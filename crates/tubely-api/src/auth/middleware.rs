use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the bearer credential to a user before the request reaches a handler.
///
/// Runs ahead of path parsing and body reads, so an unauthenticated upload is
/// rejected without consuming its body.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix(BEARER_PREFIX) {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            ))
            .into_response();
        }
    };

    let user_id = match state.credentials.validate(token) {
        Ok(id) => id,
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::debug!(user_id = %user_id, "Request authenticated");
    request.extensions_mut().insert(AuthUser { user_id });

    next.run(request).await
}

//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video upload service. Uploaded MP4s are classified by orientation, remuxed for progressive playback and stored in an object store; clients receive short-lived signed URLs."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
        handlers::media_file::serve_media,
        handlers::health::health_check,
    ),
    components(schemas(
        models::VideoResponse,
        models::Orientation,
        error::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video records and uploads"),
        (name = "media", description = "Signed local media access"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

//! Signed local media and public route tests.

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app().await;
    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/videos/{video_id}/upload"].is_object());
}

#[tokio::test]
async fn test_forged_signature_is_forbidden() {
    let app = setup_test_app().await;
    let expires = (chrono::Utc::now() + chrono::Duration::minutes(10)).timestamp();

    let response = app
        .client()
        .get("/media/local/landscape/whatever.mp4")
        .add_query_param("expires", expires)
        .add_query_param("signature", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_media_route_needs_no_bearer_token() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .get("/media/local/landscape/whatever.mp4")
        .add_query_param("expires", 0)
        .add_query_param("signature", "bogus")
        .await;

    // Rejected on the signature, not on authentication.
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_list_requires_authentication() {
    let app = setup_test_app().await;
    let response = app.client().get("/videos").await;
    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

mod common;

use common::*;

use axum::http::{header, StatusCode};
use media_storage::Environment;

// Happy path tests

#[tokio::test]
async fn test_create_upload_happy_path() {
    let setup = TestContext::new(None);

    let response = setup
        .send_post_request("/uploads")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    let upload_id = body["uploadId"].as_str().expect("uploadId is a string");
    let url = body["url"].as_str().expect("url is a string");

    assert_eq!(upload_id.len(), 30);
    assert!(!url.is_empty());
    assert!(url.contains(&format!("{upload_id}/original")));
    assert!(url.contains("X-Amz-Expires=300"));
}

#[tokio::test]
async fn test_create_upload_returns_fresh_ids() {
    let setup = TestContext::new(None);

    let mut ids = Vec::new();
    for _ in 0..5 {
        let response = setup.send_post_request("/uploads").await.unwrap();
        let body = parse_response_body(response).await;
        ids.push(body["uploadId"].as_str().unwrap().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn test_create_upload_signs_with_s3_client() {
    let setup = TestContext::with_offline_s3(Environment::Production);

    let response = setup.send_post_request("/uploads").await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    let upload_id = body["uploadId"].as_str().unwrap();
    let url = body["url"].as_str().unwrap();

    assert!(url.starts_with(&format!(
        "http://localhost:4566/{TEST_BUCKET}/{upload_id}/original?"
    )));
    assert!(url.contains("X-Amz-Expires=300"));
    assert!(url.contains("X-Amz-Signature="));
}

#[tokio::test]
async fn test_create_upload_respects_development_expiry_override() {
    let setup = TestContext::with_offline_s3(Environment::Development {
        presign_expiry_override: Some(60),
    });

    let response = setup.send_post_request("/uploads").await.unwrap();
    let body = parse_response_body(response).await;

    assert!(body["url"].as_str().unwrap().contains("X-Amz-Expires=60"));
}

// CORS decorator tests

#[tokio::test]
async fn test_plain_issuer_has_no_cors_headers() {
    let setup = TestContext::new(None);

    let response = setup.send_post_request("/uploads").await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_issuer_sets_cors_headers() {
    let setup = TestContext::new(Some("https://photos.example.com"));

    let response = setup.send_post_request("/uploads").await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://photos.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));

    // Body is identical to the plain variant
    let body = parse_response_body(response).await;
    assert_eq!(body["uploadId"].as_str().unwrap().len(), 30);
}

// Routing tests

#[tokio::test]
async fn test_uploads_rejects_get() {
    let setup = TestContext::new(None);

    let response = setup.send_get_request("/uploads").await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let setup = TestContext::new(None);

    let response = setup.send_get_request("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["semver"], env!("CARGO_PKG_VERSION"));
}

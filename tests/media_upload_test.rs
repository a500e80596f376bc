mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use call_qa_backend::create_app;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use common::{BOUNDARY, multipart_body, test_state};

const PNG_HEADER: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52,
];

fn upload_request(filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(
            BOUNDARY, filename, content_type, data,
        )))
        .unwrap()
}

#[tokio::test]
async fn test_upload_without_file_field_is_400() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(None, scratch.path()).await;
    let app = create_app(state);

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"label\"\r\n\r\navatar\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_upload_rejects_non_image_content() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(None, scratch.path()).await;
    let app = create_app(state);

    // Declared as PNG but the bytes are a shell script.
    let response = app
        .oneshot(upload_request("avatar.png", "image/png", b"#!/bin/sh\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_mime() {
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(None, scratch.path()).await;
    let app = create_app(state);

    let response = app
        .oneshot(upload_request("doc.pdf", "application/pdf", b"%PDF-1.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_storage_failure_is_500_with_error() {
    // The shared test state points at an endpoint nothing listens on,
    // so a valid image makes it to the storage call and fails there.
    let scratch = tempfile::tempdir().unwrap();
    let state = test_state(None, scratch.path()).await;
    let app = create_app(state);

    let response = app
        .oneshot(upload_request("avatar.png", "image/png", PNG_HEADER))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"].as_str().unwrap(), "Error uploading file");
}

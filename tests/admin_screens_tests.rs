// SPDX-License-Identifier: MIT

//! Access control and validation across the staff screens.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn authed_json(token: &str, method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn staff_screens_reject_anonymous_requests() {
    let (app, _state) = common::create_test_app();

    for uri in [
        "/api/admin/clients",
        "/api/admin/sales",
        "/api/admin/galleries",
        "/api/admin/users",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
    }
}

#[tokio::test]
async fn client_role_cannot_reach_staff_screens() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(
        common::TEST_USER_ID,
        Some("client"),
        &state.config.supabase_jwt_secret,
    );

    for uri in ["/api/admin/clients", "/api/admin/galleries"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {}", uri);
    }
}

#[tokio::test]
async fn operator_cannot_manage_users() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(
        common::TEST_USER_ID,
        Some("operator"),
        &state.config.supabase_jwt_secret,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (app, state) = common::create_test_app();
    // Mint an expired token by hand.
    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": common::TEST_USER_ID,
        "aud": "authenticated",
        "exp": now - 60,
        "user_metadata": { "role": "admin" },
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(state.config.supabase_jwt_secret.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/clients")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn client_record_requires_a_name() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(
        common::TEST_USER_ID,
        Some("operator"),
        &state.config.supabase_jwt_secret,
    );

    let response = app
        .oneshot(authed_json(
            &token,
            "POST",
            "/api/admin/clients",
            serde_json::json!({ "full_name": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gallery_name_is_validated() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(
        common::TEST_USER_ID,
        Some("admin"),
        &state.config.supabase_jwt_secret,
    );

    let response = app
        .oneshot(authed_json(
            &token,
            "POST",
            "/api/admin/galleries",
            serde_json::json!({ "name": "x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_upload_requires_a_file_field() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(
        common::TEST_USER_ID,
        Some("operator"),
        &state.config.supabase_jwt_secret,
    );

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"alt_text\"\r\n\r\nPraia\r\n--{b}--\r\n",
        b = boundary
    );
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/admin/galleries/{}/images",
                    common::TEST_USER_ID
                ))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_gallery_listing_needs_no_auth() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/galleries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn health_check_works() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

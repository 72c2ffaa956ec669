// SPDX-License-Identifier: MIT

//! Authentication flow tests against the offline app: local validation,
//! sign-out idempotence and session snapshot behavior.

use angra_backoffice::services::SessionState;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn signin_rejects_invalid_email_before_any_network_call() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/signin",
            serde_json::json!({ "email": "not-an-email", "password": "secret123" }),
        ))
        .await
        .unwrap();

    // The offline provider would return 500; 400 proves validation ran first.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_rejects_empty_password() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/signin",
            serde_json::json!({ "email": "ana@example.com", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_with_unreachable_provider_surfaces_error_and_stays_anonymous() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/signin",
            serde_json::json!({ "email": "ana@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.session.snapshot(), SessionState::Anonymous);
}

#[tokio::test]
async fn signup_requires_display_name() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/signup",
            serde_json::json!({ "email": "ana@example.com", "password": "secret123", "full_name": " " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_rejects_weak_password_locally() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/signup",
            serde_json::json!({ "email": "ana@example.com", "password": "123", "full_name": "Ana" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signout_is_idempotent() {
    let (app, state) = common::create_test_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signout")
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
        assert_eq!(json["success"], true);
    }

    assert_eq!(state.session.snapshot(), SessionState::Anonymous);
}

#[tokio::test]
async fn session_endpoint_reports_anonymous_without_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/session")
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
    assert_eq!(json["authenticated"], false);
    assert_eq!(json["is_admin"], false);
    assert_eq!(json["is_admin_or_operator"], false);
}

#[tokio::test]
async fn reset_password_rejects_malformed_email() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/reset-password",
            serde_json::json!({ "email": "nobody" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_password_requires_a_token() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "/auth/update-password",
            serde_json::json!({ "password": "newsecret123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

//! Anonymous share links: redirect, resolution states, retry and isolation
//! from the operator session.

#![allow(clippy::panic)]

mod common;

use axum::http::StatusCode;
use common::{
    EMPTY_SHARE_TOKEN, ShareBehavior, StubBackend, TestApp, VALID_SHARE_TOKEN, get, venue,
};

#[tokio::test]
async fn open_link_redirects_with_same_token_and_no_fetch() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    let response = app.send(get(&format!("/s/{VALID_SHARE_TOKEN}"), None)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let expected = format!("/s/{VALID_SHARE_TOKEN}/schedule");
    assert_eq!(response.location.as_deref(), Some(expected.as_str()));
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn valid_token_resolves_to_shifts() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    let response = app
        .send(get(&format!("/s/{VALID_SHARE_TOKEN}/schedule"), None))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_at("/state"), Some("resolved"));
    assert_eq!(response.str_at("/schedule/staff_name"), Some("Alice"));
    assert_eq!(app.backend.share_calls(), 1);
}

#[tokio::test]
async fn valid_token_without_shifts_is_empty_not_failed() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    let response = app
        .send(get(&format!("/s/{EMPTY_SHARE_TOKEN}/schedule"), None))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str_at("/state"), Some("empty"));
    assert_eq!(response.str_at("/schedule/venue_name"), Some("Harbor"));
}

#[tokio::test]
async fn rejected_token_shows_expired_message() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    let response = app.send(get("/s/revoked-token/schedule", None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.str_at("/state"), Some("failed"));
    assert_eq!(response.str_at("/reason"), Some("invalid_or_expired_token"));
    assert!(
        response
            .str_at("/message")
            .is_some_and(|m| m.contains("Contact your manager"))
    );
    assert_eq!(
        response.str_at("/retry_href"),
        Some("/s/revoked-token/schedule")
    );
}

#[tokio::test]
async fn malformed_token_fails_without_fetch() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    for path in ["/s/bad%20token/schedule", "/s/../schedule", "/s/./schedule"] {
        let response = app.send(get(path, None)).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(
            response.str_at("/reason"),
            Some("invalid_or_expired_token"),
            "{path}"
        );
        assert_eq!(response.str_at("/retry_href"), None, "{path}");
    }
    assert_eq!(app.backend.share_calls(), 0);
}

#[tokio::test]
async fn dot_segment_link_is_not_redirected() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));

    for path in ["/s/..", "/s/."] {
        let response = app.send(get(path, None)).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
        assert!(response.location.is_none(), "{path}");
    }
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn outage_is_retryable_with_same_token() {
    let app = TestApp::new(StubBackend::with_venues(Vec::new()));
    app.backend.set_share_behavior(ShareBehavior::Down);
    let path = format!("/s/{VALID_SHARE_TOKEN}/schedule");

    let failed = app.send(get(&path, None)).await;
    assert_eq!(failed.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(failed.str_at("/reason"), Some("unavailable"));
    let Some(retry) = failed.str_at("/retry_href").map(str::to_string) else {
        panic!("failed view must offer a retry target");
    };
    assert_eq!(retry, path);

    app.backend.set_share_behavior(ShareBehavior::Normal);
    let retried = app.send(get(&retry, None)).await;
    assert_eq!(retried.status, StatusCode::OK);
    assert_eq!(retried.str_at("/state"), Some("resolved"));
    assert_eq!(app.backend.share_calls(), 2);
}

#[tokio::test]
async fn share_view_ignores_operator_session() {
    let app = TestApp::new(StubBackend::with_venues(vec![venue("v1")]));
    let cookie = app.login_with_profile().await;
    let before = app.backend.credentials_seen().len();

    let response = app
        .send(get(&format!("/s/{VALID_SHARE_TOKEN}/schedule"), Some(&cookie)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.backend.credentials_seen().len(), before);
    assert!(response.cookie("rota_profile").is_none());
}

//! Tests for the HTTP boundary against a mock server.

use ott_errors::error::{ClientError, ErrorCategory, ErrorCode};
use ott_errors::format::{extract_field_errors, format_error};
use ott_errors::http::{error_from_response, legacy_from_response};
use ott_errors::reauth::{classify, ReauthMethod};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetch(server: &MockServer, route: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(format!("{}{route}", server.uri()))
        .send()
        .await
        .expect("mock server reachable")
}

#[tokio::test]
async fn rate_limited_response_formats_with_retry_and_ref() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .insert_header("x-request-id", "req-429")
                .set_body_json(json!({"code": "rate_limited", "detail": "Slow down"})),
        )
        .mount(&server)
        .await;

    let err = error_from_response(fetch(&server, "/catalog").await).await;
    let unified = err.as_unified().expect("structured error");
    assert_eq!(unified.code(), Some(ErrorCode::RateLimited));
    assert_eq!(unified.retry_after(), Some(30));
    assert_eq!(err.category(), ErrorCategory::RateLimit);
    assert!(err.is_retryable());
    assert_eq!(
        format_error(&err),
        "Too many requests. Please slow down. Try again in 30s. (ref: req-429)"
    );
}

#[tokio::test]
async fn validation_response_exposes_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "title": "Validation failed",
            "errors": [{"loc": ["body", "display_name"], "msg": "Too long"}],
        })))
        .mount(&server)
        .await;

    let err = error_from_response(fetch(&server, "/profile").await).await;
    let fields = extract_field_errors(&err);
    assert_eq!(fields["display_name"], vec!["Too long".to_string()]);
    assert_eq!(format_error(&err), "Some fields need your attention.");
}

#[tokio::test]
async fn server_error_body_is_not_leaked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/billing"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream pool exhausted"))
        .mount(&server)
        .await;

    let err = error_from_response(fetch(&server, "/billing").await).await;
    let text = format_error(&err);
    assert!(!text.contains("exhausted"), "{text}");
    assert_eq!(
        text,
        "Something went wrong on our end. Please try again later."
    );
}

#[tokio::test]
async fn legacy_step_up_response_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings/api-keys"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("x-reauth", "required")
                .insert_header("x-reauth-method", "mfa")
                .insert_header("x-reauth-expires-in", "300")
                .insert_header("x-reauth-id", "step-1")
                .set_body_json(json!({"detail": "Confirm to manage API keys"})),
        )
        .mount(&server)
        .await;

    let err = legacy_from_response(fetch(&server, "/settings/api-keys").await).await;
    assert!(matches!(err, ClientError::Legacy(_)));
    let info = classify(&err);
    assert!(info.required);
    assert_eq!(info.method, ReauthMethod::Mfa);
    assert_eq!(info.expires_in_seconds, Some(300));
    assert_eq!(info.request_id.as_deref(), Some("step-1"));
    assert_eq!(info.reason.as_deref(), Some("Confirm to manage API keys"));
}

#[tokio::test]
async fn structured_step_up_response_keeps_header_hints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/delete"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-reauth", "required")
                .insert_header("x-reauth-method", "password")
                .insert_header("x-reauth-ttl", "120"),
        )
        .mount(&server)
        .await;

    let err = error_from_response(fetch(&server, "/account/delete").await).await;
    let info = classify(&err);
    assert!(info.required);
    assert_eq!(info.method, ReauthMethod::Password);
    assert_eq!(info.expires_in_seconds, Some(120));
}

#[test]
fn builder_failures_become_generic_errors() {
    let reqwest_err = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let err = ClientError::from(reqwest_err);
    assert!(matches!(err, ClientError::Generic { .. }));
    assert!(!err.is_retryable());
}

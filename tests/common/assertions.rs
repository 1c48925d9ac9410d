//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a JSON error with the given status
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}, got {:?}",
        expected.as_u16(),
        json["status"]
    );
    assert!(json["error"].is_string(), "Expected error message");
}

/// Assert a channel view JSON shows a measured, colored reading
pub fn assert_colored(channel: &serde_json::Value, hex: &str) {
    assert_eq!(channel["color"], hex, "channel: {channel}");
    let background = channel["background"].as_str().unwrap_or_default();
    assert!(
        background.starts_with("linear-gradient(135deg,"),
        "Expected gradient background, got {background:?}"
    );
}

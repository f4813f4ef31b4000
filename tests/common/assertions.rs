//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use scraper::{Html, Selector};

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

/// Assert response is an HTML page
pub fn assert_html(response: &TestResponse) {
    assert_ok(response);
    let content_type = response.header("content-type").unwrap_or_default();
    assert!(
        content_type.starts_with("text/html"),
        "Expected text/html, got {content_type}"
    );
}

/// Assert JSON response has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Trimmed text of every element matching `selector`
pub fn texts(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("valid selector");
    html.select(&selector)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect()
}

/// Attribute of the first element matching `selector`
pub fn attr(html: &Html, selector: &str, name: &str) -> Option<String> {
    let selector = Selector::parse(selector).expect("valid selector");
    html.select(&selector)
        .next()
        .and_then(|e| e.value().attr(name))
        .map(str::to_string)
}

/// Number of scripts that raise the completion event in the browser
pub fn dispatch_scripts(html: &Html) -> usize {
    let selector = Selector::parse(&format!("script#{}", folio::services::DISPATCH_SCRIPT_ID))
        .expect("valid selector");
    html.select(&selector)
        .filter(|e| e.inner_html().contains(folio::services::EVENT_NAME))
        .count()
}

/// Assert the page still shows the template's placeholder content
pub fn assert_placeholder(html: &Html) {
    assert_eq!(dispatch_scripts(html), 0);
    assert_eq!(texts(html, "title"), vec!["Portfolio"]);
    assert_eq!(texts(html, ".hero-title"), vec!["Your Name"]);
    assert_eq!(texts(html, "#about .section-subtitle"), vec!["Loading..."]);
    assert_eq!(texts(html, ".timeline .timeline-item").len(), 1);
}

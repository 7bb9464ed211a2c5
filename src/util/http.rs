//! Shared HTTP client construction and response helpers.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::error::BridgeError;

/// Build the reqwest client used for every outbound call.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, BridgeError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kommo-bridge/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(access_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {access_token}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Turn an account base domain into a URL prefix.
///
/// Bare hosts get `https://`; values that already carry a scheme are kept.
pub fn base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// Map a non-success status into a bridge error, keeping the most useful message.
pub fn status_to_error(status: u16, body: &str) -> BridgeError {
    BridgeError::api(status, extract_error_message(body).unwrap_or_else(|| body.to_string()))
}

/// Kommo errors are `application/problem+json` with `title`/`detail`, OAuth
/// errors carry `hint`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    ["hint", "detail", "title", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_adds_https_to_bare_hosts() {
        assert_eq!(base_url("acme.kommo.com"), "https://acme.kommo.com");
        assert_eq!(base_url("acme.kommo.com/"), "https://acme.kommo.com");
    }

    #[test]
    fn base_url_keeps_explicit_scheme() {
        assert_eq!(base_url("http://127.0.0.1:9000"), "http://127.0.0.1:9000");
    }

    #[test]
    fn status_to_error_prefers_problem_detail() {
        let err = status_to_error(400, r#"{"title":"Bad Request","detail":"lead not found"}"#);
        match err {
            BridgeError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "lead not found");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn status_to_error_falls_back_to_raw_body() {
        let err = status_to_error(502, "bad gateway");
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
    }

    #[test]
    fn bearer_headers_set_authorization() {
        let headers = bearer_headers("tok");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    }
}

use std::time::{Duration, Instant};

use crate::catalog::model::{HttpMethod, Platform, RequestBody, RequestSpec};
use crate::engine::collector::RequestOutcome;
use crate::error::DuobenchError;

/// Build the shared HTTP client used for every request in a run.
///
/// A single client means a single connection pool, so both deployments are
/// measured under the same socket-reuse conditions.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, DuobenchError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(format!("duobench/{}", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Build a [`reqwest::Request`] from a typed [`RequestSpec`].
///
/// JSON bodies are parsed here so a malformed catalog body fails loudly
/// instead of producing confusing server-side errors.
pub fn build_request(
    client: &reqwest::Client,
    spec: &RequestSpec,
) -> Result<reqwest::Request, String> {
    let method = match spec.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    };

    let mut builder = client.request(method, &spec.url);

    for (key, value) in &spec.headers {
        builder = builder.header(key, value);
    }

    if let Some(body) = &spec.body {
        builder = match body {
            RequestBody::Json(json_str) => {
                let value: serde_json::Value = serde_json::from_str(json_str)
                    .map_err(|e| format!("Invalid JSON body: {e}"))?;
                builder.json(&value)
            }
            RequestBody::Raw(raw) => builder.body(raw.clone()),
        };
    }

    builder.build().map_err(|e| format!("Invalid request: {e}"))
}

/// Issue one request and produce its [`RequestOutcome`].
///
/// The clock covers the send plus the full body read, so transfer time is
/// part of the measurement. Success means HTTP status exactly 200; anything
/// else (including network-level errors) is a recorded failure, never a
/// panic or a propagated error.
pub async fn send_request(
    client: &reqwest::Client,
    endpoint: &str,
    platform: Platform,
    spec: &RequestSpec,
) -> RequestOutcome {
    let request = match build_request(client, spec) {
        Ok(request) => request,
        Err(message) => {
            return RequestOutcome {
                endpoint: endpoint.to_string(),
                platform,
                duration_ms: 0.0,
                status_code: 0,
                succeeded: false,
                error: Some(message),
            }
        }
    };

    let start = Instant::now();
    let result = execute(client, request).await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(status_code) => RequestOutcome {
            endpoint: endpoint.to_string(),
            platform,
            duration_ms,
            status_code,
            succeeded: status_code == 200,
            error: None,
        },
        Err(message) => RequestOutcome {
            endpoint: endpoint.to_string(),
            platform,
            duration_ms,
            status_code: 0,
            succeeded: false,
            error: Some(message),
        },
    }
}

/// Send the request and drain the body, returning the status code.
async fn execute(client: &reqwest::Client, request: reqwest::Request) -> Result<u16, String> {
    let response = client
        .execute(request)
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    let status_code = response.status().as_u16();

    // Drain the body so the measurement includes the transfer.
    response
        .bytes()
        .await
        .map_err(|e| format!("Error reading response body: {e}"))?;

    Ok(status_code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    // -----------------------------------------------------------------------
    // build_request
    // -----------------------------------------------------------------------

    #[test]
    fn maps_method_and_url() {
        let spec = RequestSpec::get("https://example.com/api/things");
        let request = build_request(&client(), &spec).expect("request should build");
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://example.com/api/things");
    }

    #[test]
    fn applies_headers() {
        let spec = RequestSpec::get("https://example.com")
            .with_bearer("tok-9")
            .with_header("Accept", "application/json");
        let request = build_request(&client(), &spec).expect("request should build");
        assert_eq!(request.headers()["Authorization"], "Bearer tok-9");
        assert_eq!(request.headers()["Accept"], "application/json");
    }

    #[test]
    fn json_body_sets_content_type_and_payload() {
        let spec = RequestSpec::post_json("https://example.com/q", "{\"k\": [1, 2]}");
        let request = build_request(&client(), &spec).expect("request should build");
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.headers()["content-type"], "application/json");
        let bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .expect("body should be buffered");
        let value: serde_json::Value = serde_json::from_slice(bytes).expect("valid JSON");
        assert_eq!(value["k"][1], 2);
    }

    #[test]
    fn raw_body_is_passed_through() {
        let mut spec = RequestSpec::get("https://example.com/raw");
        spec.method = HttpMethod::Put;
        spec.body = Some(RequestBody::Raw("plain text".to_string()));
        let request = build_request(&client(), &spec).expect("request should build");
        let bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .expect("body should be buffered");
        assert_eq!(bytes, b"plain text");
    }

    #[test]
    fn malformed_json_body_is_rejected() {
        let spec = RequestSpec::post_json("https://example.com/q", "{not json");
        let err = build_request(&client(), &spec).unwrap_err();
        assert!(err.contains("Invalid JSON body"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let spec = RequestSpec::get("not a url");
        assert!(build_request(&client(), &spec).is_err());
    }

    // -----------------------------------------------------------------------
    // send_request — failure paths that need no server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn build_failure_becomes_a_failed_outcome() {
        let spec = RequestSpec::post_json("https://example.com/q", "{broken");
        let outcome = send_request(&client(), "pair", Platform::Baseline, &spec).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.status_code, 0);
        assert!(outcome.error.as_deref().unwrap().contains("Invalid JSON body"));
    }

    #[tokio::test]
    async fn connection_refused_becomes_a_failed_outcome() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let spec = RequestSpec::get("http://192.0.2.1:9/none");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client should build");
        let outcome = send_request(&client, "pair", Platform::Candidate, &spec).await;
        assert!(!outcome.succeeded);
        assert_eq!(outcome.status_code, 0);
        assert!(outcome.error.is_some());
        assert!(outcome.duration_ms >= 0.0);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// One of the two deployments under comparison.
///
/// `Baseline` is the cluster-hosted deployment the service runs on today;
/// `Candidate` is the platform-hosted deployment being evaluated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Baseline,
    Candidate,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Platform::Baseline => "baseline",
            Platform::Candidate => "candidate",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// RequestBody
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RequestBody {
    /// A JSON payload (stored as a raw JSON string, validated before send).
    Json(String),
    /// Arbitrary raw text body.
    Raw(String),
}

// ---------------------------------------------------------------------------
// RequestSpec
// ---------------------------------------------------------------------------

/// A single concrete request description for one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
}

impl RequestSpec {
    /// Plain GET request with no headers or body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// POST request carrying a JSON body (sets `Content-Type` at send time).
    pub fn post_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: HashMap::new(),
            body: Some(RequestBody::Json(body.into())),
        }
    }

    /// Return a copy with an extra header applied.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Return a copy with a `Authorization: Bearer ...` header applied.
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }
}

// ---------------------------------------------------------------------------
// EndpointPair
// ---------------------------------------------------------------------------

/// A named logical operation tested against both deployments.
///
/// The two specs describe the same API operation; only the base URL (and
/// occasionally audience-specific headers) differ between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointPair {
    pub name: String,
    pub baseline: RequestSpec,
    pub candidate: RequestSpec,
}

impl EndpointPair {
    pub fn new(name: impl Into<String>, baseline: RequestSpec, candidate: RequestSpec) -> Self {
        Self {
            name: name.into(),
            baseline,
            candidate,
        }
    }

    /// The request spec for the given platform.
    pub fn spec(&self, platform: Platform) -> &RequestSpec {
        match platform {
            Platform::Baseline => &self.baseline,
            Platform::Candidate => &self.candidate,
        }
    }
}

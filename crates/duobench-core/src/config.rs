use crate::error::DuobenchError;

/// Default base URL of the cluster-hosted (baseline) deployment.
pub const DEFAULT_BASELINE_URL: &str = "https://api.central.ballerina.io/2.0";
/// Default base URL of the platform-hosted (candidate) deployment.
pub const DEFAULT_CANDIDATE_URL: &str = "https://choreo.api.central.ballerina.io/2.0";

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Environment-derived configuration, read once at startup.
///
/// The two bearer tokens are distinguished by audience: `registry_token` is
/// accepted by the registry/user APIs, `frontend_token` by the frontend-facing
/// organization APIs. Either may be empty, in which case the catalog simply
/// omits the endpoint pairs that need it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub baseline_base_url: String,
    pub candidate_base_url: String,
    pub org_name: String,
    pub user_id: String,
    pub registry_token: String,
    pub frontend_token: String,
}

impl RunConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, DuobenchError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an injectable lookup function.
    ///
    /// Missing credentials default to empty strings; missing base URLs fall
    /// back to the built-in defaults. A base URL that is present but blank is
    /// a configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DuobenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let baseline_base_url = lookup("DUOBENCH_BASELINE_URL")
            .unwrap_or_else(|| DEFAULT_BASELINE_URL.to_string());
        let candidate_base_url = lookup("DUOBENCH_CANDIDATE_URL")
            .unwrap_or_else(|| DEFAULT_CANDIDATE_URL.to_string());

        if baseline_base_url.trim().is_empty() {
            return Err(DuobenchError::Config(
                "DUOBENCH_BASELINE_URL must not be blank".to_string(),
            ));
        }
        if candidate_base_url.trim().is_empty() {
            return Err(DuobenchError::Config(
                "DUOBENCH_CANDIDATE_URL must not be blank".to_string(),
            ));
        }

        Ok(Self {
            // Trailing slashes would double up when joining catalog paths.
            baseline_base_url: baseline_base_url.trim_end_matches('/').to_string(),
            candidate_base_url: candidate_base_url.trim_end_matches('/').to_string(),
            org_name: lookup("ORG_NAME").unwrap_or_default(),
            user_id: lookup("USER_UUID").unwrap_or_default(),
            registry_token: lookup("AUTH_TOKEN").unwrap_or_default(),
            frontend_token: lookup("FRONTEND_AUTH_TOKEN").unwrap_or_default(),
        })
    }

    /// True when the registry-audience token and user id are both available.
    pub fn has_registry_credentials(&self) -> bool {
        !self.registry_token.is_empty() && !self.user_id.is_empty()
    }

    /// True when the frontend-audience token and user id are both available.
    pub fn has_frontend_credentials(&self) -> bool {
        !self.frontend_token.is_empty() && !self.user_id.is_empty()
    }
}

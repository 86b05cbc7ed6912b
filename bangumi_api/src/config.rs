//! Client configuration: base URL, identity header, and optional credential.

use std::time::Duration;

/// Production API root.
pub const API_BASE: &str = "https://api.bgm.tv";

/// Identity sent as `User-Agent` when none is configured. The API rejects
/// requests without a descriptive user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("bangumi-ranking/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the [`Client`](crate::Client) needs to talk to the API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Bearer token, passed through untouched.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            access_token: None,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads `BANGUMI_API_BASE`, `BANGUMI_USER_AGENT` and `BANGUMI_ACCESS_TOKEN`
    /// from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            base_url: non_blank("BANGUMI_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            user_agent: non_blank("BANGUMI_USER_AGENT").unwrap_or(defaults.user_agent),
            access_token: non_blank("BANGUMI_ACCESS_TOKEN"),
            timeout: defaults.timeout,
        }
    }

    /// Points the config at a different API root. Used for testing with wiremock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the bearer token. Blank tokens are treated as absent.
    pub fn with_access_token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.access_token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

//! HTTP client for the Bangumi v0 API.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    query::{BrowseQuery, Query, SearchQuery},
    types::{Paged, Subject},
    ClientConfig, TransportError,
};

/// HTTP client for the Bangumi v0 API.
///
/// Every request carries the configured `User-Agent` and, when a token is
/// configured, an `Authorization: Bearer` header. Requests time out after
/// the configured duration (30 seconds by default). Failures are never
/// retried here.
pub struct Client {
    http: reqwest::Client,
    /// API root. Defaults to `https://api.bgm.tv`.
    base_api_url: String,
    access_token: Option<String>,
}

impl Client {
    /// Creates a client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                TransportError::Client(e)
            })?;
        Ok(Self {
            http,
            base_api_url: config.base_url,
            access_token: config.access_token,
        })
    }

    /// Creates a client with default identity against a custom base URL.
    /// Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, TransportError> {
        Self::new(ClientConfig::default().with_base_url(base_url))
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, TransportError> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            TransportError::InvalidUrl(e)
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// Sends one request and decodes the JSON response body.
    ///
    /// `path` is relative to the base URL. Non-2xx statuses, network errors,
    /// timeouts and undecodable bodies all surface as [`TransportError`].
    pub async fn send<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        Q: Query,
        B: Serialize + ?Sized,
    {
        let url = self.get_url(path, query)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header("accept", "application/json");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            TransportError::Network(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            TransportError::Network(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            TransportError::Decode {
                source: e,
                body: snippet,
            }
        })
    }

    /// Browses subjects of one type: `GET /v0/subjects`.
    pub async fn get_subjects(&self, query: &BrowseQuery) -> Result<Paged<Subject>, TransportError> {
        self.send::<Paged<Subject>, BrowseQuery, ()>(Method::GET, "/v0/subjects", Some(query), None)
            .await
    }

    /// Searches subjects with server-side filters: `POST /v0/search/subjects`.
    pub async fn search_subjects(
        &self,
        query: &SearchQuery,
    ) -> Result<Paged<Subject>, TransportError> {
        self.send::<Paged<Subject>, SearchQuery, _>(
            Method::POST,
            "/v0/search/subjects",
            Some(query),
            Some(&query.body()),
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

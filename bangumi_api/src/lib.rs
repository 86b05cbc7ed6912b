//! Typed HTTP client for the Bangumi v0 REST API.
//!
//! Covers the two subject listing endpoints used for rankings: the browse
//! listing (`GET /v0/subjects`) and the filtered search
//! (`POST /v0/search/subjects`).

mod client;
mod config;
mod errors;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::config::{ClientConfig, API_BASE, DEFAULT_USER_AGENT, REQUEST_TIMEOUT};
pub use self::errors::TransportError;
pub use self::query::{
    BrowseQuery, BrowseSort, Query, QueryCommon, SearchBody, SearchFilter, SearchQuery,
    SearchSort, PAGE_LIMIT,
};

use serde::{Deserialize, Serialize};

/// One page of a listing. Both subject endpoints share this envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    /// Number of matches on the server across all pages.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

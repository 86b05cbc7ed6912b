//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] paging fields.

use url::Url;

/// Largest page the API serves in one call.
pub const PAGE_LIMIT: u32 = 50;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for offset pagination.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the number of results per page, clamped to `1..=PAGE_LIMIT`.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = limit.clamp(1, PAGE_LIMIT);
        self
    }

    /// Sets the zero-based offset of the first result.
    fn with_offset(mut self, offset: u64) -> Self
    where
        Self: Sized,
    {
        self.get_common().offset = offset;
        self
    }
}

/// Offset pagination shared by the browse and search endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCommon {
    /// Results per page. Defaults to [`PAGE_LIMIT`].
    pub limit: u32,
    /// Zero-based offset of the first result.
    pub offset: u64,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            limit: PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl QueryCommon {
    /// Appends `limit` and `offset` to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string())
            .append_pair("offset", &self.offset.to_string());
        url
    }
}

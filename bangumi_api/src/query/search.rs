use std::fmt;

use serde::Serialize;
use url::Url;

use crate::types::SubjectType;

use super::common::{Query, QueryCommon};

/// Sort keys accepted by `POST /v0/search/subjects`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    /// Relevance to the keyword.
    Match,
    /// Number of collecting users.
    Heat,
    /// Site rank.
    #[default]
    Rank,
    /// Average score.
    Score,
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchSort::Match => "match",
            SearchSort::Heat => "heat",
            SearchSort::Rank => "rank",
            SearchSort::Score => "score",
        };
        write!(f, "{}", s)
    }
}

/// Server-side filter block of a search request.
///
/// Range filters are comparison expressions such as `>=2020-01-01` or `<=9`.
/// Empty lists are left out of the request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchFilter {
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub subject_types: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub air_date: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rating: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rating_count: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meta_tags: Vec<String>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.subject_types.is_empty()
            && self.air_date.is_empty()
            && self.rating.is_empty()
            && self.rating_count.is_empty()
            && self.meta_tags.is_empty()
    }
}

/// JSON body sent to the search endpoint.
#[derive(Debug, Serialize)]
pub struct SearchBody<'a> {
    pub keyword: &'a str,
    pub sort: SearchSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a SearchFilter>,
}

/// Query for the filtered search endpoint. Paging goes in the URL, everything
/// else in the body.
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub common: QueryCommon,
    pub keyword: String,
    pub sort: SearchSort,
    pub filter: SearchFilter,
}

impl Query for SearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        self.common.add_to_url(url)
    }
}

impl SearchQuery {
    /// Builds the request body. A blank keyword becomes a single space since
    /// the endpoint rejects an empty one.
    pub fn body(&self) -> SearchBody<'_> {
        let keyword = if self.keyword.trim().is_empty() {
            " "
        } else {
            self.keyword.as_str()
        };
        SearchBody {
            keyword,
            sort: self.sort,
            filter: (!self.filter.is_empty()).then_some(&self.filter),
        }
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    pub fn with_sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_subject_type(mut self, subject_type: SubjectType) -> Self {
        self.filter.subject_types.push(subject_type.code());
        self
    }

    pub fn with_air_dates(mut self, exprs: &[String]) -> Self {
        self.filter.air_date.extend_from_slice(exprs);
        self
    }

    pub fn with_rating(mut self, expr: &str) -> Self {
        self.filter.rating.push(expr.to_string());
        self
    }

    pub fn with_rating_count(mut self, expr: &str) -> Self {
        self.filter.rating_count.push(expr.to_string());
        self
    }

    pub fn with_meta_tags(mut self, tags: &[String]) -> Self {
        self.filter.meta_tags.extend_from_slice(tags);
        self
    }
}

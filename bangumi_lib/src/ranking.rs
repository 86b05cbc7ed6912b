//! Ranking retrieval: strategy selection and target-bounded pagination.
//!
//! A request with no filters browses the ranked listing. Any filter switches
//! to the search endpoint so the server discards non-matching subjects
//! before they are transferred. Search results routinely include subjects
//! without a site rank, so search mode keeps them (ranked [`UNRANKED`]) and
//! leaves "ranked only" to [`RankedRequest::apply_view`].

use bangumi_api::types::{Paged, Subject};
use bangumi_api::{BrowseQuery, BrowseSort, Client, Query, SearchQuery, SearchSort, PAGE_LIMIT};

use crate::category::Category;
use crate::error::RetrievalError;
use crate::normalize::{normalize, Row, UNRANKED};

/// Client-side filters. Any populated field routes the request to search mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankingFilters {
    /// Air-date bounds such as `>=2020-01-01`.
    pub air_date: Vec<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    /// Minimum number of ratings. Zero means no minimum.
    pub rating_count_min: Option<u32>,
    pub meta_tags: Vec<String>,
    /// Free-text search term. Blank means none.
    pub keyword: Option<String>,
}

impl RankingFilters {
    pub fn is_empty(&self) -> bool {
        self.keyword().is_none()
            && self.air_date.is_empty()
            && self.rating_min.is_none()
            && self.rating_max.is_none()
            && self.rating_count_expr().is_none()
            && self.meta_tags.is_empty()
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn rating_exprs(&self) -> Vec<String> {
        let mut exprs = Vec::new();
        if let Some(min) = self.rating_min {
            exprs.push(format!(">={}", min));
        }
        if let Some(max) = self.rating_max {
            exprs.push(format!("<={}", max));
        }
        exprs
    }

    fn rating_count_expr(&self) -> Option<String> {
        self.rating_count_min
            .filter(|n| *n > 0)
            .map(|n| format!(">={}", n))
    }
}

/// Which endpoint a ranking request is served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetrievalStrategy {
    /// `GET /v0/subjects`, sorted by rank. Only ranked rows are kept.
    Browse,
    /// `POST /v0/search/subjects` with the filters applied server-side.
    Search,
}

impl RetrievalStrategy {
    pub fn select(filters: &RankingFilters) -> Self {
        if filters.is_empty() {
            RetrievalStrategy::Browse
        } else {
            RetrievalStrategy::Search
        }
    }

    /// Whether rows without a rank or date survive normalization.
    pub fn allows_unranked(self) -> bool {
        matches!(self, RetrievalStrategy::Search)
    }
}

/// A ranking request from a presentation collaborator.
#[derive(Clone, Debug)]
pub struct RankedRequest {
    pub category: Category,
    pub target_count: usize,
    pub filters: RankingFilters,
    /// Hide [`UNRANKED`] rows in [`RankedRequest::apply_view`].
    pub only_ranked: bool,
}

impl RankedRequest {
    pub fn new(category: Category, target_count: usize) -> Self {
        Self {
            category,
            target_count,
            filters: RankingFilters::default(),
            only_ranked: true,
        }
    }

    pub fn with_filters(mut self, filters: RankingFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_only_ranked(mut self, only_ranked: bool) -> Self {
        self.only_ranked = only_ranked;
        self
    }

    pub fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::select(&self.filters)
    }

    /// Presentation view of fetched rows: drops unranked rows when asked to,
    /// then orders by rank. Equal ranks keep their fetch order.
    pub fn apply_view(&self, rows: Vec<Row>) -> Vec<Row> {
        let mut rows = if self.only_ranked {
            ranked_only(rows)
        } else {
            rows
        };
        rows.sort_by_key(|r| r.rank);
        rows
    }
}

/// Keeps rows that carry a real rank.
pub fn ranked_only(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter().filter(|r| r.rank != UNRANKED).collect()
}

/// Fetches up to `target_count` normalized rows in arrival order.
///
/// Pages of at most [`PAGE_LIMIT`] are requested one after another until
/// enough rows are collected or a page holds fewer than [`PAGE_LIMIT`]
/// subjects. Any request failure
/// aborts the whole fetch; rows collected so far are dropped.
pub async fn fetch_ranking(client: &Client, request: &RankedRequest) -> Result<Vec<Row>, RetrievalError> {
    let strategy = request.strategy();
    let allow_unranked = strategy.allows_unranked();
    let target = request.target_count;
    tracing::debug!(
        "fetching {} {} rows via {:?}",
        target,
        request.category,
        strategy
    );

    let mut rows: Vec<Row> = Vec::with_capacity(target.min(PAGE_LIMIT as usize * 4));
    let mut offset: u64 = 0;
    let mut dropped = 0usize;

    while rows.len() < target {
        let limit = (target - rows.len()).min(PAGE_LIMIT as usize) as u32;
        let page = fetch_page(client, strategy, request, offset, limit).await?;
        let received = page.data.len();

        for subject in &page.data {
            match normalize(subject, allow_unranked) {
                Some(row) => {
                    rows.push(row);
                    if rows.len() >= target {
                        break;
                    }
                }
                None => dropped += 1,
            }
        }
        tracing::debug!(
            "offset {}: received {}, kept {} total, dropped {} total",
            offset,
            received,
            rows.len(),
            dropped
        );

        if received < PAGE_LIMIT as usize {
            break;
        }
        offset += received as u64;
    }

    Ok(rows)
}

async fn fetch_page(
    client: &Client,
    strategy: RetrievalStrategy,
    request: &RankedRequest,
    offset: u64,
    limit: u32,
) -> Result<Paged<Subject>, RetrievalError> {
    let page = match strategy {
        RetrievalStrategy::Browse => {
            let query = BrowseQuery::new(request.category.subject_type())
                .with_sort(BrowseSort::Rank)
                .with_limit(limit)
                .with_offset(offset);
            client.get_subjects(&query).await?
        }
        RetrievalStrategy::Search => {
            let filters = &request.filters;
            let mut query = SearchQuery::default()
                .with_sort(SearchSort::Rank)
                .with_subject_type(request.category.subject_type())
                .with_air_dates(&filters.air_date)
                .with_meta_tags(&filters.meta_tags)
                .with_limit(limit)
                .with_offset(offset);
            for expr in filters.rating_exprs() {
                query = query.with_rating(&expr);
            }
            if let Some(expr) = filters.rating_count_expr() {
                query = query.with_rating_count(&expr);
            }
            if let Some(keyword) = filters.keyword() {
                query = query.with_keyword(keyword);
            }
            client.search_subjects(&query).await?
        }
    };
    Ok(page)
}

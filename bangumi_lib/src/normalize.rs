//! Conversion of raw subjects into the canonical [`Row`].

use bangumi_api::types::Subject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rank assigned to rows that have no site rank. Never a real rank; sorts
/// after every ranked row.
pub const UNRANKED: i64 = 999_999;

/// Canonical, display-ready record for one subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: i64,
    pub name: String,
    /// Chinese title, or `name` when the subject has none.
    pub name_cn: String,
    /// Air or release date as given by the source. Empty only for rows
    /// normalized with `allow_unranked`.
    pub date: String,
    pub meta_tags: String,
    pub score: Option<f64>,
    /// Number of ratings.
    pub score_total: u64,
    /// Site rank, or [`UNRANKED`].
    pub rank: i64,
}

impl Row {
    pub fn is_ranked(&self) -> bool {
        self.rank != UNRANKED
    }
}

/// Normalizes one subject, or returns `None` when policy excludes it.
///
/// Without `allow_unranked`, subjects with no rank (missing or 0) or no date
/// are dropped. With it they are kept, ranked [`UNRANKED`] and dated `""`.
pub fn normalize(subject: &Subject, allow_unranked: bool) -> Option<Row> {
    let rating = subject.rating.as_ref();

    let rank = match effective_rank(subject) {
        Some(rank) => rank,
        None if allow_unranked => UNRANKED,
        None => return None,
    };

    let date = match non_empty(&subject.date).or_else(|| non_empty(&subject.air_date)) {
        Some(date) => date.to_string(),
        None if allow_unranked => String::new(),
        None => return None,
    };

    let name = subject.name.clone().unwrap_or_default();
    let name_cn = non_empty(&subject.name_cn)
        .map(str::to_string)
        .unwrap_or_else(|| name.clone());

    let meta_tags = subject
        .meta_tags
        .as_deref()
        .unwrap_or_default()
        .join(", ");

    Some(Row {
        id: subject.id,
        name,
        name_cn,
        date,
        meta_tags,
        score: rating.and_then(|r| r.score).or(subject.score),
        score_total: score_total(subject),
        rank,
    })
}

/// Rank from the rating block, else the top-level field. Zero and negative
/// values mean "no rank".
pub(crate) fn effective_rank(subject: &Subject) -> Option<i64> {
    subject
        .rating
        .as_ref()
        .and_then(|r| r.rank)
        .filter(|r| *r > 0)
        .or(subject.rank)
        .filter(|r| *r > 0)
}

/// Explicit total first, then the API breakdown, then the archive breakdown.
fn score_total(subject: &Subject) -> u64 {
    let rating = subject.rating.as_ref();
    rating
        .and_then(|r| r.total)
        .map(|t| t.max(0) as u64)
        .or_else(|| rating.and_then(|r| r.count.as_ref()).and_then(breakdown_sum))
        .or_else(|| subject.score_details.as_ref().and_then(breakdown_sum))
        .unwrap_or(0)
}

/// Sum of a `{bucket: votes}` map. `None` unless every value is a
/// non-negative number.
fn breakdown_sum(value: &Value) -> Option<u64> {
    let map = value.as_object()?;
    map.values().try_fold(0u64, |acc, v| {
        let votes = v.as_u64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })?;
        Some(acc.saturating_add(votes))
    })
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

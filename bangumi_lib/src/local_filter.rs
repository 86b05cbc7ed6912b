//! Filtering and ordering of rows already on hand, such as an archive split.
//!
//! Unlike [`crate::ranking::RankingFilters`] nothing here reaches the server:
//! every predicate runs over [`Row`] values in memory.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::RetrievalError;
use crate::monthly::YearMonth;
use crate::normalize::Row;

/// Column to order filtered rows by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Site rank. Always ascending.
    #[default]
    Rank,
    Score,
    Votes,
    Date,
    Name,
}

impl FromStr for SortKey {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank" => Ok(SortKey::Rank),
            "score" => Ok(SortKey::Score),
            "votes" => Ok(SortKey::Votes),
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            other => Err(RetrievalError::InvalidFilter(format!(
                "unknown sort column '{}'. Valid values: rank, score, votes, date, name",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(RetrievalError::InvalidFilter(format!(
                "unknown sort order '{}'. Valid values: asc, desc",
                other
            ))),
        }
    }
}

/// In-memory filters. Every populated field must match for a row to stay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalFilters {
    /// Case-insensitive substring of `name_cn` or `name`.
    pub name: Option<String>,
    /// First month kept, inclusive.
    pub from: Option<YearMonth>,
    /// Last month kept, inclusive.
    pub to: Option<YearMonth>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub votes_min: u64,
    /// Each tag must appear in the row's joined tag string.
    pub tags: Vec<String>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl LocalFilters {
    fn check(&self) -> Result<(), RetrievalError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(RetrievalError::InvalidFilter(format!(
                    "start month {} is after end month {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    fn matches(&self, row: &Row, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !row.name_cn.to_lowercase().contains(needle)
                && !row.name.to_lowercase().contains(needle)
            {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(month) = YearMonth::parse(&row.date) else {
                return false;
            };
            if self.from.is_some_and(|from| month < from) || self.to.is_some_and(|to| month > to) {
                return false;
            }
        }

        if self.score_min.is_some() || self.score_max.is_some() {
            let Some(score) = row.score else {
                return false;
            };
            if self.score_min.is_some_and(|min| score < min)
                || self.score_max.is_some_and(|max| score > max)
            {
                return false;
            }
        }

        row.score_total >= self.votes_min
            && self.tags.iter().all(|tag| row.meta_tags.contains(tag.as_str()))
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        match self.sort {
            SortKey::Rank => a.rank.cmp(&b.rank),
            // Rows without a score go last in either direction.
            SortKey::Score => match (a.score, b.score) {
                (Some(x), Some(y)) => self.order.apply(x.total_cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Votes => self.order.apply(a.score_total.cmp(&b.score_total)),
            SortKey::Date => self.order.apply(a.date.cmp(&b.date)),
            SortKey::Name => self.order.apply(a.name_cn.cmp(&b.name_cn)),
        }
    }
}

/// Rows passing `filters`, ordered by the chosen column. Ties keep input order.
pub fn filter_rows(rows: &[Row], filters: &LocalFilters) -> Result<Vec<Row>, RetrievalError> {
    filters.check()?;
    let needle = filters
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut kept: Vec<Row> = rows
        .iter()
        .filter(|row| filters.matches(row, needle.as_deref()))
        .cloned()
        .collect();
    kept.sort_by(|a, b| filters.compare(a, b));
    tracing::debug!("local filter kept {} of {} rows", kept.len(), rows.len());
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name_cn: &str, date: &str, score: Option<f64>, votes: u64, rank: i64) -> Row {
        Row {
            id,
            name: format!("Original {}", id),
            name_cn: name_cn.to_string(),
            date: date.to_string(),
            meta_tags: if id % 2 == 0 { "TV, 原创, 科幻".to_string() } else { "TV, 漫画改".to_string() },
            score,
            score_total: votes,
            rank,
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row(1, "星际牛仔", "1998-04-03", Some(9.1), 12000, 3),
            row(2, "攻壳机动队", "2002-10-01", Some(8.8), 8000, 10),
            row(3, "轻音少女", "2009-04-02", Some(7.6), 15000, 400),
            row(4, "来自深渊", "2017-07-07", Some(8.6), 9000, 25),
            row(5, "无名之作", "2017-07-20", None, 3, 9000),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn default_filters_sort_by_rank_ascending() {
        let rows = filter_rows(&sample(), &LocalFilters::default()).unwrap();
        assert_eq!(ids(&rows), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn rank_ignores_descending_order() {
        let filters = LocalFilters {
            order: SortOrder::Descending,
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn name_matches_either_title_case_insensitively() {
        let filters = LocalFilters {
            name: Some(" original 3 ".to_string()),
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![3]);

        let filters = LocalFilters {
            name: Some("深渊".to_string()),
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![4]);
    }

    #[test]
    fn month_range_is_inclusive() {
        let filters = LocalFilters {
            from: YearMonth::new(2002, 10),
            to: YearMonth::new(2017, 7),
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![2, 4, 3, 5]);
    }

    #[test]
    fn reversed_month_range_is_rejected() {
        let filters = LocalFilters {
            from: YearMonth::new(2020, 1),
            to: YearMonth::new(2019, 12),
            ..LocalFilters::default()
        };
        assert!(matches!(
            filter_rows(&sample(), &filters),
            Err(RetrievalError::InvalidFilter(_))
        ));
    }

    #[test]
    fn score_bounds_drop_unscored_rows() {
        let filters = LocalFilters {
            score_min: Some(8.6),
            score_max: Some(9.0),
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![2, 4]);
    }

    #[test]
    fn votes_and_tags_must_all_match() {
        let filters = LocalFilters {
            votes_min: 8500,
            tags: vec!["原创".to_string(), "科幻".to_string()],
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![4]);
    }

    #[test]
    fn score_sort_puts_unscored_last_both_ways() {
        let mut filters = LocalFilters {
            sort: SortKey::Score,
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![1, 2, 4, 3, 5]);

        filters.order = SortOrder::Ascending;
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![3, 4, 2, 1, 5]);
    }

    #[test]
    fn votes_and_date_sorts_follow_direction() {
        let filters = LocalFilters {
            sort: SortKey::Votes,
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![3, 1, 4, 2, 5]);

        let filters = LocalFilters {
            sort: SortKey::Date,
            order: SortOrder::Ascending,
            ..LocalFilters::default()
        };
        assert_eq!(ids(&filter_rows(&sample(), &filters).unwrap()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn sort_keys_and_orders_parse() {
        assert_eq!("Votes".parse::<SortKey>().unwrap(), SortKey::Votes);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert!("popularity".parse::<SortKey>().is_err());
        assert!("up".parse::<SortOrder>().is_err());
    }
}

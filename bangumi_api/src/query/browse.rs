use std::fmt;

use url::Url;

use crate::types::SubjectType;

use super::common::{Query, QueryCommon};

/// Sort keys accepted by `GET /v0/subjects`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrowseSort {
    /// Air or release date.
    Date,
    /// Site rank, best first.
    #[default]
    Rank,
}

impl fmt::Display for BrowseSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BrowseSort::Date => "date",
            BrowseSort::Rank => "rank",
        };
        write!(f, "{}", s)
    }
}

/// Query for the unfiltered subject listing.
#[derive(Clone, Debug, Default)]
pub struct BrowseQuery {
    pub common: QueryCommon,
    pub subject_type: SubjectType,
    pub sort: BrowseSort,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl Query for BrowseQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("type", &self.subject_type.code().to_string())
            .append_pair("sort", &self.sort.to_string());
        let mut url = self.common.add_to_url(&url);
        if let Some(year) = self.year {
            url.query_pairs_mut().append_pair("year", &year.to_string());
        }
        if let Some(month) = self.month {
            url.query_pairs_mut().append_pair("month", &month.to_string());
        }
        url
    }
}

impl BrowseQuery {
    pub fn new(subject_type: SubjectType) -> Self {
        Self {
            subject_type,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: BrowseSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }
}

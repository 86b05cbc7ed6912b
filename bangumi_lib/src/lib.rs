//! Library layer for Bangumi rankings: row normalization, ranking
//! retrieval, full scans, archive dumps with local filtering, and the monthly
//! best-of selector.
//!
//! Wraps the `bangumi_api` crate. Everything here is sequential; one request
//! is in flight at a time.

pub mod archive;
pub mod category;
pub mod error;
pub mod local_filter;
pub mod monthly;
pub mod normalize;
pub mod ranking;
pub mod scan;
pub mod validation;

pub use bangumi_api;
pub use bangumi_api::types;
pub use bangumi_api::{BrowseSort, Client, ClientConfig, TransportError};

pub use archive::{find_subject, read_archive, ArchiveSplit};
pub use category::Category;
pub use error::RetrievalError;
pub use local_filter::{filter_rows, LocalFilters, SortKey, SortOrder};
pub use monthly::{select_monthly_best, MonthPick, MonthlyBest, MonthlyRecord, YearMonth};
pub use normalize::{normalize, Row, UNRANKED};
pub use ranking::{fetch_ranking, ranked_only, RankedRequest, RankingFilters, RetrievalStrategy};
pub use scan::{
    fetch_all_rows, fetch_all_rows_with_progress, ScanOptions, ScanProgress, SubjectScanner,
    DEFAULT_SCAN_DELAY,
};

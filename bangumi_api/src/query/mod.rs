mod common;
pub use self::common::{Query, QueryCommon, PAGE_LIMIT};

mod browse;
pub use self::browse::{BrowseQuery, BrowseSort};

mod search;
pub use self::search::{SearchBody, SearchFilter, SearchQuery, SearchSort};

//! Full listing traversal for bulk export.
//!
//! Unlike the ranking fetch this walks every page the server reports,
//! pausing between pages to stay under the API's rate limits.

use std::time::Duration;

use bangumi_api::types::Subject;
use bangumi_api::{BrowseQuery, BrowseSort, Client, Query, PAGE_LIMIT};

use crate::category::Category;
use crate::error::RetrievalError;
use crate::normalize::{normalize, Row};

/// Pause between successful pages of a full scan.
pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct ScanOptions {
    pub category: Category,
    pub sort: BrowseSort,
    pub delay: Duration,
    /// Stop after this many raw subjects. `None` scans everything.
    pub max_items: Option<usize>,
}

impl ScanOptions {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            sort: BrowseSort::Rank,
            delay: DEFAULT_SCAN_DELAY,
            max_items: None,
        }
    }

    pub fn with_sort(mut self, sort: BrowseSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Init,
    Requesting,
    Done,
    Failed,
}

/// Page-at-a-time cursor over the browse listing.
///
/// Stops once `offset + received` reaches the server-reported total, a page
/// comes back empty, or `max_items` subjects have been handed out. After an
/// error the scanner is finished for good; start a new one to retry.
pub struct SubjectScanner<'a> {
    client: &'a Client,
    options: ScanOptions,
    state: ScanState,
    offset: u64,
    total: Option<u64>,
    yielded: usize,
}

impl<'a> SubjectScanner<'a> {
    pub fn new(client: &'a Client, options: ScanOptions) -> Self {
        Self {
            client,
            options,
            state: ScanState::Init,
            offset: 0,
            total: None,
            yielded: 0,
        }
    }

    /// Server-reported total, known after the first page.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Raw subjects handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, ScanState::Done | ScanState::Failed)
    }

    /// Fetches the next page, or `None` once the scan is finished.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Subject>>, RetrievalError> {
        match self.state {
            ScanState::Done | ScanState::Failed => return Ok(None),
            ScanState::Requesting if !self.options.delay.is_zero() => {
                tokio::time::sleep(self.options.delay).await;
            }
            ScanState::Init | ScanState::Requesting => {}
        }

        let query = BrowseQuery::new(self.options.category.subject_type())
            .with_sort(self.options.sort)
            .with_limit(PAGE_LIMIT)
            .with_offset(self.offset);
        let page = match self.client.get_subjects(&query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("scan aborted at offset {}: {}", self.offset, e);
                self.state = ScanState::Failed;
                return Err(e.into());
            }
        };

        let received = page.data.len() as u64;
        self.total = Some(page.total);
        let mut items = page.data;
        if let Some(max) = self.options.max_items {
            items.truncate(max.saturating_sub(self.yielded));
        }
        self.yielded += items.len();
        self.offset += received;

        let capped = self
            .options
            .max_items
            .is_some_and(|max| self.yielded >= max);
        let exhausted = received == 0 || self.offset >= page.total;
        self.state = if capped || exhausted {
            ScanState::Done
        } else {
            ScanState::Requesting
        };
        tracing::debug!(
            "scan offset {} of {}: {} subjects",
            self.offset,
            page.total,
            items.len()
        );

        if items.is_empty() {
            return Ok(None);
        }
        Ok(Some(items))
    }
}

/// Where a running scan stands after a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanProgress {
    /// Subjects in the page just received.
    pub page_len: usize,
    /// Subjects received so far, this page included.
    pub yielded: usize,
    /// Server-reported total.
    pub total: Option<u64>,
}

/// Scans the whole listing and keeps rows that are ranked and dated.
pub async fn fetch_all_rows(client: &Client, options: ScanOptions) -> Result<Vec<Row>, RetrievalError> {
    fetch_all_rows_with_progress(client, options, |_| {}).await
}

/// [`fetch_all_rows`], calling `on_page` after every non-empty page.
pub async fn fetch_all_rows_with_progress<F>(
    client: &Client,
    options: ScanOptions,
    mut on_page: F,
) -> Result<Vec<Row>, RetrievalError>
where
    F: FnMut(ScanProgress),
{
    let mut scanner = SubjectScanner::new(client, options);
    let mut rows = Vec::new();
    while let Some(page) = scanner.next_page().await? {
        rows.extend(page.iter().filter_map(|s| normalize(s, false)));
        on_page(ScanProgress {
            page_len: page.len(),
            yielded: scanner.yielded(),
            total: scanner.total(),
        });
    }
    Ok(rows)
}

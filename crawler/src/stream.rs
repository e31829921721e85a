use std::collections::VecDeque;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::ingest::{ReviewSource, START_CURSOR};
use crate::model::RawReview;
use crawler_core::{Error, Result};

/// Lazy, non-restartable sequence of raw reviews spanning the whole
/// paginated collection.
///
/// One page is buffered at a time and a new fetch is issued only once the
/// buffer is drained, so the remote is never queried ahead of consumption.
/// Termination is decided by the running count of yielded records against
/// the `total_reviews` hint captured from the first page. Page length is
/// deliberately not trusted, since the collection may omit records.
pub struct ReviewStream {
    source: Arc<dyn ReviewSource>,
    cursor: String,
    buffer: VecDeque<RawReview>,
    total: Option<u64>,
    yielded: u64,
    exhausted: bool,
}

impl ReviewStream {
    pub fn new(source: Arc<dyn ReviewSource>) -> Self {
        Self {
            source,
            cursor: START_CURSOR.to_string(),
            buffer: VecDeque::new(),
            total: None,
            yielded: 0,
            exhausted: false,
        }
    }

    /// Produce the next record, or `None` once the collection is exhausted.
    pub async fn next(&mut self) -> Result<Option<RawReview>> {
        loop {
            if let Some(review) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(review));
            }

            if self.exhausted {
                return Ok(None);
            }

            if let Some(total) = self.total {
                if self.yielded >= total {
                    self.exhausted = true;
                    return Ok(None);
                }
            }

            let page = self.source.fetch_page(&self.cursor).await?;
            counter!("crawler_pages_fetched", "source" => self.source.source_id().to_string())
                .increment(1);

            if self.total.is_none() {
                let total = page.total.ok_or_else(|| {
                    Error::malformed("first page is missing query_summary.total_reviews")
                })?;
                debug!(total, "Captured collection size");
                self.total = Some(total);
            }

            // Cursor advances exactly once per fetch and is never reused.
            self.cursor = page.cursor;

            if page.reviews.is_empty() {
                // The collection silently dropped records (spam filtering and
                // the like); without this the same tail cursor would be
                // fetched forever.
                warn!(
                    yielded = self.yielded,
                    total = ?self.total,
                    "Collection ended before the reported total was reached"
                );
                self.exhausted = true;
                return Ok(None);
            }

            self.buffer.extend(page.reviews);
        }
    }

    /// Collection size reported by the first page, once captured.
    pub fn total_hint(&self) -> Option<u64> {
        self.total
    }

    /// Records yielded so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }
}

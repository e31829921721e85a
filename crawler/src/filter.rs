use chrono::{Local, LocalResult, NaiveDate, TimeZone};

use crate::model::RawReview;
use crate::stream::ReviewStream;
use crawler_core::{Error, Result};

/// Calendar window restricting which reviews are admitted.
///
/// Bounds are local midnights of the two dates; a review is admitted when
/// `start < timestamp_created <= end`. The lower bound is exclusive and the
/// upper bound inclusive; asymmetric, but preserved as observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
    start_ts: i64,
    end_ts: i64,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Ok(Self {
            start,
            end,
            start_ts: local_midnight_ts(start)?,
            end_ts: local_midnight_ts(end)?,
        })
    }

    pub fn admits(&self, timestamp: i64) -> bool {
        self.start_ts < timestamp && timestamp <= self.end_ts
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

fn local_midnight_ts(date: NaiveDate) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Validation(format!("no midnight for date {date}")))?;
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        // A DST jump can make midnight ambiguous or skipped; take the
        // earliest instant of the day either way.
        LocalResult::Ambiguous(dt, _) => Ok(dt.timestamp()),
        LocalResult::None => match date.and_hms_opt(1, 0, 0) {
            Some(later) => Local
                .from_local_datetime(&later)
                .earliest()
                .map(|dt| dt.timestamp())
                .ok_or_else(|| {
                    Error::Validation(format!("{date} has no representable local start"))
                }),
            None => Err(Error::Validation(format!(
                "{date} has no representable local start"
            ))),
        },
    }
}

/// Lazy filtering stage over a [`ReviewStream`].
///
/// Without a window it is the identity transform; with one, it drops records
/// outside the window. Order is preserved and records are never mutated.
pub struct DateFilter {
    stream: ReviewStream,
    window: Option<DateWindow>,
}

impl DateFilter {
    pub fn new(stream: ReviewStream, window: Option<DateWindow>) -> Self {
        Self { stream, window }
    }

    pub async fn next(&mut self) -> Result<Option<RawReview>> {
        loop {
            let Some(review) = self.stream.next().await? else {
                return Ok(None);
            };
            match &self.window {
                Some(window) if !window.admits(review.timestamp_created) => continue,
                _ => return Ok(Some(review)),
            }
        }
    }

    /// Records pulled from the collection so far, admitted or not.
    pub fn records_seen(&self) -> u64 {
        self.stream.yielded()
    }

    pub fn total_hint(&self) -> Option<u64> {
        self.stream.total_hint()
    }
}

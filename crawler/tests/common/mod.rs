#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use crawler::ingest::ReviewSource;
use crawler::model::{NormalizedReview, RawReview, ReviewAuthor, ReviewPage};
use crawler::sink::BatchSink;
use crawler_core::{Error, Result};

/// Deterministic in-memory source that serves a scripted sequence of pages.
/// Fetching past the script is an error, so tests catch over-fetching.
pub struct ScriptedSource {
    pages: Mutex<VecDeque<ReviewPage>>,
    fetches: AtomicU64,
}

impl ScriptedSource {
    pub fn new(pages: Vec<ReviewPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn fetches(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewSource for ScriptedSource {
    async fn fetch_page(&self, _cursor: &str) -> Result<ReviewPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Internal("scripted source ran out of pages".into()))
    }

    fn source_id(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub batches: Mutex<Vec<(u64, Vec<NormalizedReview>)>>,
}

impl BatchSink for MemorySink {
    fn write_batch(&self, index: u64, batch: &[NormalizedReview]) -> Result<PathBuf> {
        self.batches.lock().unwrap().push((index, batch.to_vec()));
        Ok(PathBuf::from(format!("{index}.json")))
    }
}

/// Sink that rejects every write.
#[derive(Default)]
pub struct FailingSink;

impl BatchSink for FailingSink {
    fn write_batch(&self, index: u64, _batch: &[NormalizedReview]) -> Result<PathBuf> {
        Err(Error::SinkWrite {
            path: PathBuf::from(format!("{index}.json")),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "sink rejected write"),
        })
    }
}

pub fn review(id: &str, timestamp: i64) -> RawReview {
    RawReview {
        recommendationid: id.to_string(),
        author: ReviewAuthor {
            steamid: format!("7656119800000{id}"),
            playtime_at_review: 321,
        },
        timestamp_created: timestamp,
        review: format!("review body {id}"),
        comment_count: 2,
        votes_up: 5,
        votes_funny: 1,
        voted_up: true,
    }
}

pub fn page(reviews: Vec<RawReview>, cursor: &str, total: Option<u64>) -> ReviewPage {
    ReviewPage {
        reviews,
        cursor: cursor.to_string(),
        total,
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::debug;

use crate::filter::DateWindow;
use crate::model::NormalizedReview;
use crate::normalize::SOURCE_TAG;
use crawler_core::{Error, Result};

/// Durable destination for flushed batches.
pub trait BatchSink: Send + Sync {
    /// Write one whole batch under its zero-based index. A batch is written
    /// exactly once; indices are never overwritten.
    fn write_batch(&self, index: u64, batch: &[NormalizedReview]) -> Result<PathBuf>;
}

/// Filesystem sink: one JSON array file per batch under
/// `{root}/{app_id}/{window|all}/{index}.json`.
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(output_root: &Path, app_id: u64, window: Option<&DateWindow>) -> Result<Self> {
        let subdir = match window {
            Some(w) => format!("{}_{}", w.start(), w.end()),
            None => "all".to_string(),
        };
        let dir = output_root.join(app_id.to_string()).join(subdir);

        // Create-if-absent, parents included; re-running against an existing
        // tree is fine.
        fs::create_dir_all(&dir).map_err(|e| Error::SinkWrite {
            path: dir.clone(),
            source: e,
        })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BatchSink for JsonDirSink {
    fn write_batch(&self, index: u64, batch: &[NormalizedReview]) -> Result<PathBuf> {
        let path = self.dir.join(format!("{index}.json"));
        let body = serde_json::to_vec(batch)?;

        fs::write(&path, body).map_err(|e| Error::SinkWrite {
            path: path.clone(),
            source: e,
        })?;

        counter!("crawler_reviews_persisted", "source" => SOURCE_TAG).increment(batch.len() as u64);
        debug!(index, records = batch.len(), path = %path.display(), "Wrote batch file");

        Ok(path)
    }
}

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info, instrument};

use crate::filter::DateFilter;
use crate::model::{GameLabels, HarvestSummary, NormalizedReview};
use crate::normalize::normalize;
use crate::sink::BatchSink;
use crawler_core::Result;

/// Drives the filtered review stream to completion: normalizes each record,
/// accumulates fixed-size batches and flushes them to the sink in order.
pub struct Harvester {
    filter: DateFilter,
    sink: Arc<dyn BatchSink>,
    labels: GameLabels,
    batch_size: usize,
    max_batches: Option<u64>,
}

impl Harvester {
    pub fn new(
        filter: DateFilter,
        sink: Arc<dyn BatchSink>,
        labels: GameLabels,
        batch_size: usize,
        max_batches: Option<u64>,
    ) -> Self {
        Self {
            filter,
            sink,
            labels,
            batch_size,
            max_batches,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<HarvestSummary> {
        let started = Instant::now();
        let mut batch: Vec<NormalizedReview> = Vec::with_capacity(self.batch_size);
        let mut summary = HarvestSummary::default();
        let mut next_index = 0u64;

        loop {
            // Stop pulling the instant the batch cap is reached. The cap is
            // checked before any further pull, so a partial batch never
            // accumulates past it and is never flushed.
            if self.max_batches.is_some_and(|cap| next_index >= cap) {
                break;
            }

            let Some(raw) = self.filter.next().await? else {
                if !batch.is_empty() {
                    self.flush(next_index, &mut batch)?;
                    summary.batches_written += 1;
                }
                break;
            };

            summary.reviews_admitted += 1;
            counter!("crawler_reviews_admitted").increment(1);

            batch.push(normalize(&raw, &self.labels)?);
            if batch.len() == self.batch_size {
                self.flush(next_index, &mut batch)?;
                next_index += 1;
                summary.batches_written += 1;
            }
        }

        summary.reviews_fetched = self.filter.records_seen();

        info!(
            fetched = summary.reviews_fetched,
            admitted = summary.reviews_admitted,
            batches = summary.batches_written,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Harvest completed"
        );

        Ok(summary)
    }

    fn flush(&self, index: u64, batch: &mut Vec<NormalizedReview>) -> Result<()> {
        let path = self.sink.write_batch(index, batch)?;
        histogram!("crawler_batch_records").record(batch.len() as f64);

        info!(
            index,
            records = batch.len(),
            path = %path.display(),
            "Flushed batch"
        );

        batch.clear();
        Ok(())
    }
}

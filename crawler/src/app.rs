use std::sync::Arc;

use tracing::{info, instrument};

use crate::filter::{DateFilter, DateWindow};
use crate::ingest::{ReviewSource, SteamSource};
use crate::model::{GameLabels, HarvestSummary};
use crate::pipeline::Harvester;
use crate::sink::JsonDirSink;
use crate::stream::ReviewStream;
use crawler_core::{Config, Result};

pub struct App {
    harvester: Harvester,
}

impl App {
    #[instrument(skip(config))]
    pub async fn new(config: Config) -> Result<Self> {
        info!(app_id = config.harvest.app_id, "Initializing crawler");

        let window = config
            .harvest
            .window()?
            .map(|(start, end)| DateWindow::new(start, end))
            .transpose()?;

        let source = SteamSource::new(&config.fetch, config.harvest.app_id)?;

        info!("Performing source health check");
        source.health_check().await?;

        let sink = JsonDirSink::new(
            &config.harvest.output_root,
            config.harvest.app_id,
            window.as_ref(),
        )?;
        info!(dir = %sink.dir().display(), "Writing batches");

        let stream = ReviewStream::new(Arc::new(source));
        let filter = DateFilter::new(stream, window);
        let labels = GameLabels {
            game: config.harvest.game.clone(),
            franchise: config.harvest.franchise.clone(),
        };

        let harvester = Harvester::new(
            filter,
            Arc::new(sink),
            labels,
            config.harvest.batch_size,
            config.harvest.max_batches,
        );

        Ok(Self { harvester })
    }

    pub async fn run(&mut self) -> Result<HarvestSummary> {
        self.harvester.run().await
    }
}

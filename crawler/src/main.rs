use clap::{Parser, Subcommand};
use crawler::app::App;
use crawler::ingest::{ReviewSource, SteamSource};
use crawler_core::{telemetry, Config};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser)]
#[clap(name = "crawler")]
#[clap(about = "Steam review harvester", version)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest reviews into batched JSON files
    Harvest {
        /// Steam app to harvest
        #[clap(long, env = "CRAWLER_APP_ID")]
        app_id: Option<u64>,

        /// Game label stamped onto every record
        #[clap(long, env = "CRAWLER_GAME")]
        game: Option<String>,

        /// Franchise label stamped onto every record
        #[clap(long, env = "CRAWLER_FRANCHISE")]
        franchise: Option<String>,

        /// Records per output batch
        #[clap(long, env = "CRAWLER_BATCH_SIZE")]
        batch_size: Option<usize>,

        /// Stop after this many flushed batches
        #[clap(long, env = "CRAWLER_MAX_BATCHES")]
        max_batches: Option<u64>,

        /// Window start date, YYYY-MM-DD (exclusive)
        #[clap(long, env = "CRAWLER_FROM", requires = "to")]
        from: Option<String>,

        /// Window end date, YYYY-MM-DD (inclusive)
        #[clap(long, env = "CRAWLER_TO", requires = "from")]
        to: Option<String>,

        /// Root directory for batch files
        #[clap(long, env = "CRAWLER_OUTPUT_ROOT")]
        output_root: Option<PathBuf>,
    },

    /// Check that the review endpoint is reachable
    Probe {
        #[clap(long, env = "CRAWLER_APP_ID")]
        app_id: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Fatal error");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    telemetry::init(&config.telemetry)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest {
            app_id,
            game,
            franchise,
            batch_size,
            max_batches,
            from,
            to,
            output_root,
        } => {
            // Override config with CLI args
            if let Some(app_id) = app_id {
                config.harvest.app_id = app_id;
            }
            if let Some(game) = game {
                config.harvest.game = game;
            }
            if let Some(franchise) = franchise {
                config.harvest.franchise = franchise;
            }
            if let Some(batch_size) = batch_size {
                config.harvest.batch_size = batch_size;
            }
            if let Some(max_batches) = max_batches {
                config.harvest.max_batches = Some(max_batches);
            }
            if from.is_some() {
                config.harvest.window_start = from;
                config.harvest.window_end = to;
            }
            if let Some(output_root) = output_root {
                config.harvest.output_root = output_root;
            }

            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            info!(
                app_id = config.harvest.app_id,
                batch_size = config.harvest.batch_size,
                window_start = ?config.harvest.window_start,
                window_end = ?config.harvest.window_end,
                "Starting harvest"
            );

            let mut app = App::new(config).await?;
            let summary = app.run().await?;

            info!(
                fetched = summary.reviews_fetched,
                admitted = summary.reviews_admitted,
                batches = summary.batches_written,
                "Done"
            );
        }

        Commands::Probe { app_id } => {
            if let Some(app_id) = app_id {
                config.harvest.app_id = app_id;
            }

            let source = SteamSource::new(&config.fetch, config.harvest.app_id)?;
            source.health_check().await?;
            info!(app_id = config.harvest.app_id, "Review endpoint reachable");
        }
    }

    telemetry::shutdown();
    Ok(())
}

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use feed_core::{
    create_feature_table, write_csv, Criteria, FeatureCollection, PipelineConfig, SearchQuery,
    DEFAULT_SITE_ORIGIN,
};
use feed_scrapers::{FundaClient, Pipeline};
use funda_feed::{load_known_ids, push, PushConfig};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch listings and write the resulting feature collection
    #[command(about = "Fetch listings and write the resulting feature collection")]
    #[command(long_about = "Search Funda, filter by the acquisition criteria, geocode the survivors and write them as GeoJSON, CSV or a table.")]
    Fetch(FetchCommand),

    /// Fetch listings and push them to the map service
    #[command(about = "Fetch listings and push them to the map service")]
    #[command(long_about = "Run the full pipeline and POST the feature collection to the refresh endpoint with bearer authentication.")]
    Push(PushCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Geojson,
    Csv,
    Table,
}

#[derive(Args)]
struct RunArgs {
    /// Search area, can be repeated (-a, --area)
    #[arg(short = 'a', long = "area", num_args = 1.., value_delimiter = ',')]
    areas: Vec<String>,

    /// Offering type (-t, --offering-type)
    #[arg(short = 't', long, default_value = "buy")]
    offering_type: String,

    /// Minimum price in EUR (-p, --min-price)
    #[arg(short = 'p', long, default_value_t = 450_000)]
    min_price: u64,

    /// Maximum price in EUR (-P, --max-price)
    #[arg(short = 'P', long, default_value_t = 513_000)]
    max_price: u64,

    /// Minimum number of bedrooms (-b, --min-bedrooms)
    #[arg(short = 'b', long, default_value_t = 2)]
    min_bedrooms: u32,

    /// Minimum living area in square meters (-m, --min-living-area)
    #[arg(short = 'm', long, default_value_t = 65.0)]
    min_living_area: f64,

    /// Worst accepted energy label (-e, --energy-floor)
    #[arg(short = 'e', long, default_value = "D")]
    energy_floor: String,

    /// Reject listings whose energy label is "unknown"
    #[arg(long)]
    reject_unknown_label: bool,

    /// Concurrent detail fetches (-w, --workers)
    #[arg(short = 'w', long, default_value_t = 8)]
    workers: usize,

    /// Pause between search pages in milliseconds
    #[arg(long, default_value_t = 1000)]
    page_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// JSON array of listing ids the map service already has (-k, --known-ids)
    #[arg(short = 'k', long)]
    known_ids: Option<PathBuf>,
}

impl RunArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        let defaults = SearchQuery::default();
        PipelineConfig {
            search: SearchQuery {
                areas: if self.areas.is_empty() {
                    defaults.areas
                } else {
                    self.areas.clone()
                },
                offering_type: self.offering_type.clone(),
                price_min: Some(self.min_price),
                price_max: Some(self.max_price),
            },
            criteria: Criteria {
                min_bedrooms: self.min_bedrooms,
                min_living_area: self.min_living_area,
                energy_floor: self.energy_floor.clone(),
                accept_unknown_label: !self.reject_unknown_label,
            },
            workers: self.workers,
            page_delay: Duration::from_millis(self.page_delay_ms),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            ..PipelineConfig::default()
        }
    }

    fn known_ids(&self) -> anyhow::Result<Option<HashSet<String>>> {
        let Some(path) = &self.known_ids else {
            return Ok(None);
        };
        let ids = load_known_ids(path)?;
        info!("Loaded {} known listing ids", ids.len());
        Ok(Some(ids))
    }

    async fn run(&self) -> anyhow::Result<FeatureCollection> {
        let known_ids = self.known_ids()?;
        let source = FundaClient::new(Duration::from_secs(self.timeout_secs))
            .context("failed to build the Funda client")?;

        let pipeline = Pipeline::new(Arc::new(source), self.pipeline_config())
            .with_progress(Arc::new(|msg: &str| info!("{}", msg.trim())));

        let collection = pipeline
            .run(known_ids.as_ref())
            .await
            .context("listing aggregation failed")?;
        Ok(collection)
    }
}

#[derive(Parser)]
#[command(about = "Fetch listings and write the resulting feature collection")]
struct FetchCommand {
    #[command(flatten)]
    run: RunArgs,

    /// Output file, stdout when omitted (-o, --output)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format (-f, --format)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Geojson)]
    format: OutputFormat,
}

#[derive(Parser)]
#[command(about = "Fetch listings and push them to the map service")]
struct PushCommand {
    #[command(flatten)]
    run: RunArgs,

    /// Refresh endpoint of the map service
    #[arg(long, env = "REFRESH_URL")]
    refresh_url: Option<String>,

    /// Bearer token for the refresh endpoint
    #[arg(long, env = "REFRESH_SECRET", hide_env_values = true)]
    refresh_secret: Option<String>,
}

fn write_collection(collection: &FeatureCollection, format: OutputFormat, out: impl Write) -> anyhow::Result<()> {
    let mut out = BufWriter::new(out);
    match format {
        OutputFormat::Geojson => serde_json::to_writer(&mut out, collection)?,
        OutputFormat::Csv => write_csv(collection, &mut out)?,
        OutputFormat::Table => writeln!(out, "{}", create_feature_table(collection))?,
    }
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the GeoJSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(cmd) => {
            let collection = cmd.run.run().await?;
            match &cmd.output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    write_collection(&collection, cmd.format, file)?;
                    info!("Wrote {} features to {}", collection.len(), path.display());
                }
                None => write_collection(&collection, cmd.format, io::stdout().lock())?,
            }
        }
        Commands::Push(cmd) => {
            // Fail before the long fetch when the destination is missing
            let config = PushConfig::from_parts(cmd.refresh_url.clone(), cmd.refresh_secret.clone())?;
            let collection = cmd.run.run().await?;

            let client = reqwest::Client::new();
            let reply = push(&client, &collection, &config).await?;
            info!("Server response: {}", reply);
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pvwatch::config::ConfigLoader;
use pvwatch::investigation::{run_investigation, AppContext};
use pvwatch::llm::{OpenAiCompatProvider, StaticSummarizer, Summarizer};
use pvwatch::logging::init_logging;
use pvwatch::store::MemoryStore;
use pvwatch::AnomalyFilter;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Anomaly triage for five-minute solar-plant telemetry
#[derive(Parser)]
#[command(name = "pvwatch", version, about)]
struct Cli {
    /// Configuration file (defaults to pvwatch.{toml,yaml,json} if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter a telemetry JSON array and print the flagged rows
    Filter {
        /// Input file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
        /// Use a full-day seasonal period (288 samples) instead of the default 48
        #[arg(long)]
        daily_period: bool,
    },
    /// Run a full investigation for one plant-day and print the record
    Run {
        /// Plant identifier
        #[arg(long)]
        plant: String,
        /// Plant-day (YYYY-MM-DD)
        #[arg(long)]
        date: chrono::NaiveDate,
        /// Telemetry input file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn read_payload(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load_from_file(cli.config.as_deref())
        .load_from_env()
        .build()?;
    init_logging(config.log_level.as_str())?;

    match cli.command {
        Command::Filter {
            input,
            pretty,
            daily_period,
        } => {
            let payload = read_payload(input.as_ref())?;
            let mut filter_config = config.filter.clone();
            if daily_period {
                filter_config = filter_config.with_daily_period();
            }
            let filter = AnomalyFilter::new(filter_config)?;

            let flagged = tokio::task::spawn_blocking(move || -> pvwatch::Result<_> {
                let records = pvwatch::telemetry::parse_records(&payload)?;
                Ok(filter.filter(&records))
            })
            .await
            .context("filter task panicked")??;

            let out = if pretty {
                serde_json::to_string_pretty(&flagged)?
            } else {
                serde_json::to_string(&flagged)?
            };
            println!("{out}");
        }
        Command::Run { plant, date, input } => {
            let payload = read_payload(input.as_ref())?;

            let summarizer: Arc<dyn Summarizer> = if config.llm.api_key.is_empty() {
                warn!("llm.api_key not configured; using the static summarizer");
                Arc::new(StaticSummarizer::default())
            } else {
                Arc::new(OpenAiCompatProvider::new(config.llm.clone())?)
            };
            let ctx = AppContext::new(config, Arc::new(MemoryStore::new()), summarizer);

            let investigation = run_investigation(&ctx, &plant, date, payload).await?;
            println!("{}", serde_json::to_string_pretty(&investigation)?);
        }
    }

    Ok(())
}

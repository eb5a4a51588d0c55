use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use lead_pipeline::app::ProcessBatchUseCase;
use lead_pipeline::config::Config;
use lead_pipeline::domain::RawListing;
use lead_pipeline::infra::JsonLeadStore;
use lead_pipeline::{logging, sample};

#[derive(Parser)]
#[command(name = "lead_pipeline")]
#[command(about = "Used-car listing lead normalization and deduplication pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a batch of scraped listings against the known-lead store
    Process {
        /// JSON file with an array of raw listings
        #[arg(long)]
        input: PathBuf,
        /// JSON file holding the known-lead snapshots (created if missing)
        #[arg(long, default_value = "known_leads.json")]
        known: PathBuf,
        /// Where to write the partitioned batch report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Generate demo listings for dry runs
    Sample {
        /// Number of listings to generate
        #[arg(long, default_value_t = 20)]
        count: usize,
        /// Output JSON file
        #[arg(long, default_value = "sample_listings.json")]
        output: PathBuf,
    },
    /// Validate the configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let now = Utc::now();

    // Configuration problems are fatal before any listing is touched.
    let config = Config::load_or_default(&cli.config)?;
    if let Err(e) = config.pipeline.validate(now) {
        error!("invalid configuration: {}", e);
        return Err(e.into());
    }

    match cli.command {
        Commands::Process {
            input,
            known,
            report,
        } => {
            let content = fs::read_to_string(&input)?;
            let listings: Vec<RawListing> = serde_json::from_str(&content)?;
            info!(count = listings.len(), input = %input.display(), "loaded raw listings");

            // The store backs both ports; two handles over the same files.
            let known_store = JsonLeadStore::new(known.clone(), None);
            let sink_store = JsonLeadStore::new(known, report);
            let use_case = ProcessBatchUseCase::with_default_extractor(
                Box::new(known_store),
                Box::new(sink_store),
                config.pipeline.clone(),
            );

            let outcome = use_case.process(&listings, now).await?;

            println!("\n📊 Pipeline Results:");
            println!("   Total listings: {}", outcome.total());
            println!("   New leads: {}", outcome.new.len());
            println!("   Updated leads: {}", outcome.updated.len());
            println!("   Duplicates: {}", outcome.duplicates.len());
            println!("   Rejected: {}", outcome.rejected.len());

            if !outcome.rejected.is_empty() {
                println!("\n⚠️  Rejected listings:");
                for lead in &outcome.rejected {
                    println!(
                        "   - {}: {}",
                        lead.normalized.raw.title,
                        lead.rejection_reasons.join(", ")
                    );
                }
            }
        }
        Commands::Sample { count, output } => {
            let listings = sample::generate_listings(count);
            fs::write(&output, serde_json::to_string_pretty(&listings)?)?;
            println!("Wrote {} sample listings to {}", count, output.display());
        }
        Commands::CheckConfig => {
            println!(
                "Configuration OK: min_vehicle_year = {}, update_policy_enabled = {}",
                config.pipeline.min_vehicle_year, config.pipeline.update_policy_enabled
            );
        }
    }

    Ok(())
}

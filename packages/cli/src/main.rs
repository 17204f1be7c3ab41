#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the land map toolchain.
//!
//! Downloads a city's parcel, vacant land, and zoning layers and searches
//! the saved copy offline. Uses `indicatif-log-bridge` (via
//! [`land_map_cli_utils::init_logger`]) so log lines and download progress
//! bars share the terminal.

mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use land_map_cli_utils::IndicatifProgress;
use land_map_filter::LandMap;
use land_map_parcel_models::{LandUse, ParcelQuery};
use land_map_source::download::{build_client, download_city, load_city_layers};
use land_map_source::registry::{all_sources, find_source};
use land_map_source::regulations::{all_regulations, regulation_for};

/// Environment variable overriding the default data directory.
const DATA_DIR_ENV: &str = "LAND_MAP_DATA_DIR";

#[derive(Parser)]
#[command(name = "land_map", about = "Parcel search over city GIS layers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all registered city sources
    Sources,
    /// Download a city's parcel, vacant land, and zoning layers
    Fetch {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// HTTP request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
    /// Search downloaded parcels
    Search {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Print matches as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one parcel with its zoning and development standards
    Details {
        /// Parcel identifier (e.g., "04512101")
        parcel_id: String,
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// List known zoning regulations and their land-use classes
    Regulations,
}

#[derive(Args)]
struct DatasetArgs {
    /// Source identifier (e.g., "charlotte")
    #[arg(long, default_value = "charlotte")]
    source: String,
    /// Root data directory (overrides `LAND_MAP_DATA_DIR`, default "data")
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl DatasetArgs {
    fn city_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("data"))
            .join(self.source.trim().to_ascii_lowercase())
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive substring of the parcel identifier
    #[arg(long)]
    id: Option<String>,
    /// Minimum acreage (inclusive)
    #[arg(long, default_value = "0")]
    min_acres: f64,
    /// Maximum acreage (inclusive)
    #[arg(long)]
    max_acres: Option<f64>,
    /// Only parcels on the vacant land layer
    #[arg(long)]
    vacant_only: bool,
    /// Zoning code (e.g., "R-3")
    #[arg(long)]
    zoning: Option<String>,
    /// Maximum number of matches to return
    #[arg(long)]
    limit: Option<usize>,
}

impl From<FilterArgs> for ParcelQuery {
    fn from(args: FilterArgs) -> Self {
        Self {
            id_contains: args.id,
            min_acres: args.min_acres,
            max_acres: args.max_acres,
            vacant_only: args.vacant_only,
            zoning_code: args.zoning,
            limit: args.limit,
        }
    }
}

/// Loads the saved layers of `dataset` into a fresh [`LandMap`].
fn load_land_map(dataset: &DatasetArgs) -> Result<LandMap, Box<dyn std::error::Error>> {
    let source = find_source(&dataset.source)?;
    let dir = dataset.city_dir();
    log::info!("Loading {} from {}", source.name(), dir.display());

    let layers = load_city_layers(&source, &dir)?;
    let map = LandMap::new();
    let count = map.load_parcels(layers.parcels, &layers.vacant_ids)?;
    map.load_zoning(layers.zoning);
    log::info!(
        "Loaded {count} parcels ({} vacant), {} zoning regions",
        map.parcels().all().vacant_count(),
        map.zoning().len()
    );

    Ok(map)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = land_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => {
            println!("{:<20} NAME", "ID");
            println!("{}", "-".repeat(50));
            for source in &all_sources() {
                println!("{:<20} {}", source.id(), source.name());
            }
        }
        Commands::Fetch {
            dataset,
            timeout_secs,
        } => {
            let source = find_source(&dataset.source)?;
            let dir = dataset.city_dir();
            let client = build_client(Duration::from_secs(timeout_secs))?;

            let dir = download_city(&client, &source, &dir, |label| {
                IndicatifProgress::layer_bar(&multi, label)
            })
            .await?;
            log::info!("Saved {} layers to {}", source.name(), dir.display());
        }
        Commands::Search {
            dataset,
            filter,
            json,
        } => {
            let map = load_land_map(&dataset)?;
            let result = map.search(&filter.into())?;

            if json {
                println!("{}", output::to_json(&result)?);
            } else {
                print!("{}", output::to_table(&result));
                println!();
                println!("{}", output::summary(&result));
            }
        }
        Commands::Details { parcel_id, dataset } => {
            let map = load_land_map(&dataset)?;
            let Some(found) = map.details(&parcel_id) else {
                return Err(format!("Parcel not found: {parcel_id}").into());
            };
            let regulation = match found.zoning_code() {
                Some(code) => regulation_for(code)?,
                None => None,
            };
            println!("{}", output::details(&found, regulation.as_ref()));
        }
        Commands::Regulations => {
            println!("{:<10} {:<14} STANDARDS", "CODE", "LAND USE");
            println!("{}", "-".repeat(60));
            for regulation in all_regulations()? {
                let land_use = LandUse::from_zoning_code(&regulation.code);
                println!(
                    "{:<10} {:<14} {}",
                    regulation.code,
                    land_use.label(),
                    regulation.setbacks
                );
            }
        }
    }

    Ok(())
}

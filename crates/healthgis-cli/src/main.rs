mod facility;
mod location;
mod search;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "healthgis")]
#[command(about = "Find health facilities and driving directions to them")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List facilities matching the given filters
    Search {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        location: LocationArgs,
        /// Only show facilities within `--radius` km of the user location
        #[arg(long)]
        near: bool,
        /// Search radius in kilometres (used with `--near`)
        #[arg(long)]
        radius: Option<f64>,
        /// Extra filter as `key=value`, e.g. `--filter useDistance=true`
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        extra: Vec<String>,
        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the district, region, and amenity values available for filtering
    Facets,
    /// Show one facility in detail
    Facility {
        /// Facility id as returned by `search`
        id: String,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Driving directions from the user location to a facility
    Directions {
        /// Facility id as returned by `search`
        #[arg(long)]
        facility_id: String,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Print aggregate facility statistics
    Stats,
}

#[derive(Debug, Default, Args)]
pub(crate) struct FilterArgs {
    /// Free-text search over name, district, region, amenity, and operator
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long, value_parser = region_parser())]
    region: Option<String>,
    /// Facility type, e.g. `hospital` or `clinic`
    #[arg(long)]
    amenity: Option<String>,
    /// Only facilities with emergency services
    #[arg(long)]
    emergency: bool,
    /// Only wheelchair-accessible facilities
    #[arg(long)]
    wheelchair: bool,
}

/// User position given on the command line. Without it the configured
/// fallback location is used.
#[derive(Debug, Default, Clone, Copy, Args)]
pub(crate) struct LocationArgs {
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,
}

fn region_parser() -> clap::builder::PossibleValuesParser {
    clap::builder::PossibleValuesParser::new(healthgis_core::REGION_OPTIONS.iter().copied())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = healthgis_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            filters,
            location,
            near,
            radius,
            extra,
            limit,
        } => {
            let options = search::SearchOptions {
                filters,
                location,
                near,
                radius,
                extra,
                limit,
            };
            search::run_search(&config, options, cli.json).await?;
        }
        Commands::Facets => search::run_facets(&config, cli.json).await?,
        Commands::Facility { id, location } => {
            facility::run_facility(&config, &id, location, cli.json).await?;
        }
        Commands::Directions {
            facility_id,
            location,
        } => facility::run_directions(&config, &facility_id, location, cli.json).await?,
        Commands::Stats => facility::run_stats(&config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;

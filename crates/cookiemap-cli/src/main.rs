mod handoff;
mod search;
mod watch;

use std::time::Duration;

use clap::{Parser, Subcommand};
use cookiemap_core::handoff::MapApp;
use cookiemap_core::Coordinate;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cookiemap")]
#[command(about = "Find nearby stores carrying Dubai chewy cookies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ranked search and print the result
    Search {
        /// Latitude to search around (defaults to the fallback coordinate)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude to search around
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Print the published state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a map session against a scripted location route
    Watch {
        /// Route as `lat,lng;lat,lng;...` (defaults to a short walk around the fallback)
        #[arg(long, value_delimiter = ';', value_parser = parse_coordinate)]
        route: Vec<Coordinate>,
        /// Start without location permission
        #[arg(long)]
        deny_permission: bool,
        /// Delay between route points, in milliseconds
        #[arg(long, default_value = "500")]
        step_ms: u64,
    },
    /// Print the external map launch chain for a query or destination
    Handoff {
        /// Free-text place search
        #[arg(long, required_unless_present = "to", conflicts_with = "to")]
        query: Option<String>,
        /// Walking destination as `lat,lng`
        #[arg(long, value_parser = parse_coordinate, requires = "name")]
        to: Option<Coordinate>,
        /// Destination label shown by the map app
        #[arg(long)]
        name: Option<String>,
        /// Map app to target (naver or kakao)
        #[arg(long, default_value = "naver")]
        app: MapApp,
    },
}

/// Parses `lat,lng` into a coordinate.
fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got `{raw}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude `{lat}`: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude `{lng}`: {e}"))?;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(format!("coordinate must be finite, got `{raw}`"));
    }
    Ok(Coordinate::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = cookiemap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search { lat, lng, json } => {
            let origin = lat.zip(lng).map(Coordinate::from);
            search::run_search(&config, origin, json).await?;
        }
        Commands::Watch {
            route,
            deny_permission,
            step_ms,
        } => {
            watch::run_watch(
                &config,
                route,
                deny_permission,
                Duration::from_millis(step_ms),
            )
            .await?;
        }
        Commands::Handoff {
            query,
            to,
            name,
            app,
        } => handoff::run_handoff(query.as_deref(), to, name.as_deref(), app)?,
    }

    Ok(())
}

use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::geo::{Coordinate, FALLBACK_COORDINATE};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; parsing is kept separate from the process
/// environment so it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("COOKIEMAP_ENV", "development"));
    let log_level = or_default("COOKIEMAP_LOG_LEVEL", "info");
    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let places_base_url = or_default("COOKIEMAP_PLACES_BASE_URL", "https://places.googleapis.com/");
    let places_timeout_secs = parse_var::<u64>(
        "COOKIEMAP_PLACES_TIMEOUT_SECS",
        &or_default("COOKIEMAP_PLACES_TIMEOUT_SECS", "10"),
    )?;
    let user_agent = or_default("COOKIEMAP_USER_AGENT", "cookiemap/0.1 (nearby-stock)");

    let search_radius_m = parse_positive(
        "COOKIEMAP_SEARCH_RADIUS_M",
        &or_default("COOKIEMAP_SEARCH_RADIUS_M", "1000"),
    )?;
    let max_results = parse_var::<u32>(
        "COOKIEMAP_MAX_RESULTS",
        &or_default("COOKIEMAP_MAX_RESULTS", "20"),
    )?;
    let area_search_threshold_m = parse_positive(
        "COOKIEMAP_AREA_SEARCH_THRESHOLD_M",
        &or_default("COOKIEMAP_AREA_SEARCH_THRESHOLD_M", "300"),
    )?;
    let cache_radius_m = match lookup("COOKIEMAP_CACHE_RADIUS_M") {
        Ok(raw) => Some(parse_positive("COOKIEMAP_CACHE_RADIUS_M", &raw)?),
        Err(_) => None,
    };

    let fallback_coordinate = match (
        lookup("COOKIEMAP_FALLBACK_LAT"),
        lookup("COOKIEMAP_FALLBACK_LNG"),
    ) {
        (Ok(lat), Ok(lng)) => Coordinate::new(
            parse_var::<f64>("COOKIEMAP_FALLBACK_LAT", &lat)?,
            parse_var::<f64>("COOKIEMAP_FALLBACK_LNG", &lng)?,
        ),
        (Err(_), Err(_)) => FALLBACK_COORDINATE,
        _ => {
            return Err(ConfigError::PartialCoordinate {
                lat_var: "COOKIEMAP_FALLBACK_LAT".to_string(),
                lng_var: "COOKIEMAP_FALLBACK_LNG".to_string(),
            })
        }
    };

    let location_interval_secs = parse_var::<u64>(
        "COOKIEMAP_LOCATION_INTERVAL_SECS",
        &or_default("COOKIEMAP_LOCATION_INTERVAL_SECS", "10"),
    )?;
    let location_min_interval_secs = parse_var::<u64>(
        "COOKIEMAP_LOCATION_MIN_INTERVAL_SECS",
        &or_default("COOKIEMAP_LOCATION_MIN_INTERVAL_SECS", "5"),
    )?;

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        user_agent,
        search_radius_m,
        max_results,
        area_search_threshold_m,
        cache_radius_m,
        fallback_coordinate,
        location_interval_secs,
        location_min_interval_secs,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_positive(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let value = parse_var::<f64>(var, raw)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a positive number of meters, got {raw}"),
        })
    }
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

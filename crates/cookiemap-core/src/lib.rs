pub mod app_config;
pub mod brand;
pub mod config;
pub mod error;
pub mod geo;
pub mod handoff;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use brand::{match_brand, BrandRule, StoreBrand, BRAND_RULES};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use geo::{distance, format_distance, format_meters, Coordinate, FALLBACK_COORDINATE};
pub use store::{StockLevel, Store};

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Places API key. `None` disables the live provider.
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub user_agent: String,
    pub search_radius_m: f64,
    pub max_results: u32,
    pub area_search_threshold_m: f64,
    /// Radius within which a previous provider result is reused. `None` disables the cache.
    pub cache_radius_m: Option<f64>,
    pub fallback_coordinate: Coordinate,
    pub location_interval_secs: u64,
    pub location_min_interval_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_radius_m", &self.search_radius_m)
            .field("max_results", &self.max_results)
            .field("area_search_threshold_m", &self.area_search_threshold_m)
            .field("cache_radius_m", &self.cache_radius_m)
            .field("fallback_coordinate", &self.fallback_coordinate)
            .field("location_interval_secs", &self.location_interval_secs)
            .field(
                "location_min_interval_secs",
                &self.location_min_interval_secs,
            )
            .finish()
    }
}

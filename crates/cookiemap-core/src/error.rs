use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("env vars {lat_var} and {lng_var} must be set together")]
    PartialCoordinate { lat_var: String, lng_var: String },
}

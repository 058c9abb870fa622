use thiserror::Error;

/// Errors returned by the nearby-search client.
///
/// These never reach the ranking pipeline: the store catalog treats every
/// variant as "no live results" and falls back to generated stores.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an `error` object or a non-2xx status.
    #[error("Places API error {status}: {message}")]
    ApiError { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

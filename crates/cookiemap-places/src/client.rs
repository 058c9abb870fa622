//! HTTP client for the Places API nearby search.
//!
//! Wraps `reqwest` with API key handling, the field mask header, and typed
//! response deserialization. A JSON body carrying an `error` object is
//! surfaced as [`PlacesError::ApiError`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{NearbyRequest, RawPlace, SearchNearbyBody, SearchNearbyResponse, PLACE_FIELDS};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const SEARCH_NEARBY_PATH: &str = "v1/places:searchNearby";

/// Client for the Places API `places:searchNearby` endpoint.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_NEARBY_PATH))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Runs one nearby search.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the provider returns an `error` object
    ///   or a non-2xx status.
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_nearby(
        &self,
        request: &NearbyRequest,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let body = SearchNearbyBody::from(request);
        tracing::debug!(
            center = %request.center,
            radius_m = request.radius_m,
            max_results = request.max_results,
            "places nearby search"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", PLACE_FIELDS.join(","))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(source) => {
                if !status.is_success() {
                    return Err(PlacesError::ApiError {
                        status: status.as_u16().to_string(),
                        message: text.chars().take(200).collect(),
                    });
                }
                return Err(PlacesError::Deserialize {
                    context: format!("searchNearby({})", request.center),
                    source,
                });
            }
        };
        Self::check_api_error(&value)?;
        if !status.is_success() {
            return Err(PlacesError::ApiError {
                status: status.as_u16().to_string(),
                message: "unexpected HTTP status".to_string(),
            });
        }

        let parsed: SearchNearbyResponse =
            serde_json::from_value(value).map_err(|source| PlacesError::Deserialize {
                context: format!("searchNearby({})", request.center),
                source,
            })?;

        Ok(parsed.places.into_iter().map(RawPlace::from).collect())
    }

    /// Checks for a top-level `"error"` object and converts it to an error.
    fn check_api_error(body: &serde_json::Value) -> Result<(), PlacesError> {
        let Some(error) = body.get("error") else {
            return Ok(());
        };
        let status = error
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                error
                    .get("code")
                    .and_then(serde_json::Value::as_i64)
                    .map(|c| c.to_string())
            })
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let message = error
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        Err(PlacesError::ApiError { status, message })
    }
}

//! Store catalog: live nearby search with generated fallback.
//!
//! [`StoreCatalog::fetch_nearby`] always returns something. A failed or empty
//! live search is logged and replaced by [`generate_mock_stores`] output, so
//! callers never see a provider error.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use cookiemap_core::{match_brand, Coordinate, Store};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::mock::generate_mock_stores;
use crate::stock::{sample_stock, sample_update_label};
use crate::types::{NearbyRequest, RawPlace, MAX_RESULT_COUNT, SEARCH_RADIUS_METERS};

/// A live nearby-search backend.
#[async_trait]
pub trait NearbySearch: Send + Sync {
    async fn search_nearby(&self, request: &NearbyRequest) -> Result<Vec<RawPlace>, PlacesError>;
}

#[async_trait]
impl NearbySearch for PlacesClient {
    async fn search_nearby(&self, request: &NearbyRequest) -> Result<Vec<RawPlace>, PlacesError> {
        PlacesClient::search_nearby(self, request).await
    }
}

/// Source of candidate stores around a coordinate. Infallible by contract.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    async fn fetch_nearby(&self, center: Coordinate) -> Vec<Store>;
}

pub struct StoreCatalog<S> {
    live: Option<S>,
    radius_m: f64,
    max_results: u32,
    rng: Mutex<StdRng>,
}

impl<S: NearbySearch> StoreCatalog<S> {
    /// Catalog backed by `live`, or generated stores only when `None`.
    #[must_use]
    pub fn new(live: Option<S>) -> Self {
        Self::with_rng(live, StdRng::from_os_rng())
    }

    /// Catalog with a caller-provided RNG, for reproducible output.
    #[must_use]
    pub fn with_rng(live: Option<S>, rng: StdRng) -> Self {
        Self {
            live,
            radius_m: SEARCH_RADIUS_METERS,
            max_results: MAX_RESULT_COUNT,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Caps both live and generated results. Clamped to `1..=20`.
    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULT_COUNT);
        self
    }

    #[must_use]
    pub fn has_live_provider(&self) -> bool {
        self.live.is_some()
    }

    /// Stores around `center`, from the live provider when it has any,
    /// otherwise generated.
    pub async fn fetch_nearby(&self, center: Coordinate) -> Vec<Store> {
        if let Some(live) = &self.live {
            let request = NearbyRequest::stores_around(center)
                .with_radius(self.radius_m)
                .with_max_results(self.max_results);
            match live.search_nearby(&request).await {
                Ok(places) if !places.is_empty() => {
                    tracing::debug!(count = places.len(), %center, "live search returned places");
                    return self.places_to_stores(places, center);
                }
                Ok(_) => {
                    tracing::info!(%center, "live search returned no places, using generated stores");
                }
                Err(e) => {
                    tracing::warn!(%center, error = %e, "live search failed, using generated stores");
                }
            }
        } else {
            tracing::debug!(%center, "no live provider configured, using generated stores");
        }

        let stores = generate_mock_stores(center, self.max_results as usize, &mut *self.rng());
        tracing::debug!(count = stores.len(), "generated stores");
        stores
    }

    fn places_to_stores(&self, places: Vec<RawPlace>, center: Coordinate) -> Vec<Store> {
        let mut rng = self.rng();
        places
            .into_iter()
            .take(self.max_results as usize)
            .enumerate()
            .map(|(index, place)| place_to_store(place, index, center, &mut *rng))
            .collect()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<S: NearbySearch> StoreProvider for StoreCatalog<S> {
    async fn fetch_nearby(&self, center: Coordinate) -> Vec<Store> {
        StoreCatalog::fetch_nearby(self, center).await
    }
}

/// Maps one provider place to a store with synthetic stock.
///
/// Missing ids become `place_<index>`, missing locations take the query
/// center, and missing names are classified as "Unknown".
pub fn place_to_store<R: Rng + ?Sized>(
    place: RawPlace,
    index: usize,
    center: Coordinate,
    rng: &mut R,
) -> Store {
    let display_name = place.display_name.as_deref().unwrap_or("Unknown");
    let (brand, branch_name) = match_brand(display_name);
    Store {
        id: place.id.unwrap_or_else(|| format!("place_{index}")),
        brand,
        branch_name,
        coordinate: place.location.unwrap_or(center),
        stock_count: sample_stock(rng),
        last_updated: sample_update_label(rng),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

//! Reuse of the last provider result while the query point stays close.

use cookiemap_core::{distance, Coordinate, Store};

#[derive(Debug, Clone)]
struct CacheEntry {
    center: Coordinate,
    stores: Vec<Store>,
}

/// Last provider result, keyed on the coordinate it was fetched for.
///
/// An entry serves any query within `radius_m` of that coordinate. The key
/// does not move on a hit, so a slow drift eventually invalidates it.
#[derive(Debug, Clone, Default)]
pub struct NearbyCache {
    radius_m: Option<f64>,
    entry: Option<CacheEntry>,
}

impl NearbyCache {
    /// `None` disables caching.
    #[must_use]
    pub fn new(radius_m: Option<f64>) -> Self {
        Self {
            radius_m,
            entry: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.radius_m.is_some()
    }

    /// Whether a result fetched at `cached` must be refetched for `requested`.
    #[must_use]
    pub fn is_stale(&self, cached: Coordinate, requested: Coordinate) -> bool {
        match self.radius_m {
            Some(radius) => distance(cached, requested) > radius,
            None => true,
        }
    }

    #[must_use]
    pub fn lookup(&self, requested: Coordinate) -> Option<Vec<Store>> {
        let entry = self.entry.as_ref()?;
        if self.is_stale(entry.center, requested) {
            return None;
        }
        Some(entry.stores.clone())
    }

    pub fn store(&mut self, center: Coordinate, stores: &[Store]) {
        if self.is_enabled() {
            self.entry = Some(CacheEntry {
                center,
                stores: stores.to_vec(),
            });
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

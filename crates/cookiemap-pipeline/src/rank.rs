//! Distance ranking of one search result.

use std::collections::BTreeMap;

use cookiemap_core::{distance, format_meters, Coordinate, StockLevel, Store, StoreBrand};
use serde::{Deserialize, Serialize};

/// A store as the list sheet and markers show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStore {
    pub id: String,
    pub brand: StoreBrand,
    pub brand_name: String,
    /// Branch name, or the brand name when the branch is empty.
    pub branch_name: String,
    pub glyph: String,
    pub full_name: String,
    pub coordinate: Coordinate,
    pub distance_m: f64,
    pub distance_label: String,
    pub stock_count: u32,
    pub stock_level: StockLevel,
    pub last_updated: String,
}

impl RankedStore {
    #[must_use]
    pub fn from_store(store: &Store, origin: Coordinate) -> Self {
        let distance_m = distance(origin, store.coordinate);
        let brand_name = store.brand.display_name().to_string();
        let branch_name = if store.branch_name.trim().is_empty() {
            brand_name.clone()
        } else {
            store.branch_name.clone()
        };
        Self {
            id: store.id.clone(),
            brand: store.brand,
            full_name: store.full_name().trim().to_string(),
            brand_name,
            branch_name,
            glyph: store.brand.glyph().to_string(),
            coordinate: store.coordinate,
            distance_m,
            distance_label: format_meters(distance_m),
            stock_count: store.stock_count,
            stock_level: store.stock_level(),
            last_updated: store.last_updated.clone(),
        }
    }

    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.stock_count == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Sorted by ascending distance; ties keep input order.
    pub stores: Vec<RankedStore>,
    pub locations: BTreeMap<String, Coordinate>,
    pub available_count: usize,
    pub sold_out_count: usize,
}

/// Ranks `stores` by distance from `origin`.
#[must_use]
pub fn rank_stores(stores: &[Store], origin: Coordinate) -> Ranking {
    let mut ranked: Vec<RankedStore> = stores
        .iter()
        .map(|store| RankedStore::from_store(store, origin))
        .collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

    let locations = ranked
        .iter()
        .map(|store| (store.id.clone(), store.coordinate))
        .collect();
    let sold_out_count = ranked.iter().filter(|store| store.is_sold_out()).count();

    Ranking {
        available_count: ranked.len() - sold_out_count,
        sold_out_count,
        locations,
        stores: ranked,
    }
}

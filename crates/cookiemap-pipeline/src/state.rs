use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use cookiemap_core::Coordinate;
use serde::{Deserialize, Serialize};

use crate::rank::RankedStore;

/// Informational message published when a search finds nothing.
pub const EMPTY_RESULT_MESSAGE: &str = "주변 매장을 찾을 수 없습니다";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Loading,
    Ready,
}

/// Snapshot published by the ranking pipeline. Replaced wholesale per search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub stores: Vec<RankedStore>,
    pub store_locations: BTreeMap<String, Coordinate>,
    pub selected_store_id: Option<String>,
    pub current_location: Coordinate,
    pub last_searched: Option<Coordinate>,
    pub is_loading: bool,
    pub is_location_available: bool,
    pub is_manual_search: bool,
    pub available_count: usize,
    pub sold_out_count: usize,
    pub message: Option<String>,
    pub searched_at: Option<DateTime<Utc>>,
}

impl MapState {
    #[must_use]
    pub fn new(current_location: Coordinate) -> Self {
        Self {
            stores: Vec::new(),
            store_locations: BTreeMap::new(),
            selected_store_id: None,
            current_location,
            last_searched: None,
            is_loading: false,
            is_location_available: false,
            is_manual_search: false,
            available_count: 0,
            sold_out_count: 0,
            message: None,
            searched_at: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        if self.is_loading {
            SearchPhase::Loading
        } else if self.last_searched.is_some() {
            SearchPhase::Ready
        } else {
            SearchPhase::Idle
        }
    }

    #[must_use]
    pub fn selected_store(&self) -> Option<&RankedStore> {
        let id = self.selected_store_id.as_deref()?;
        self.stores.iter().find(|store| store.id == id)
    }
}

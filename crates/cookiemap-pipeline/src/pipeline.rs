//! Search state machine: `idle -> loading -> ready`, repeatable.
//!
//! The pipeline owns the published [`MapState`] and replaces it wholesale on
//! every search. It cannot fail: the store provider absorbs its own errors,
//! and an empty result becomes an informational message.
//!
//! Concurrent searches are not sequenced. Whichever completes last owns the
//! published result; `is_loading` stays set while any search is running.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use cookiemap_core::{distance, AppConfig, Coordinate};
use cookiemap_places::StoreProvider;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::NearbyCache;
use crate::location::{LocationPlatform, LocationSource};
use crate::rank::{rank_stores, Ranking};
use crate::state::{MapState, EMPTY_RESULT_MESSAGE};

/// Map-center drift after which "search this area" is offered.
pub const AREA_SEARCH_THRESHOLD_METERS: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub area_search_threshold_m: f64,
    /// Reuse radius for the last provider result. `None` disables the cache.
    pub cache_radius_m: Option<f64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            area_search_threshold_m: AREA_SEARCH_THRESHOLD_METERS,
            cache_radius_m: None,
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            area_search_threshold_m: config.area_search_threshold_m,
            cache_radius_m: config.cache_radius_m,
        }
    }
}

/// Whether `center` has moved more than `threshold_m` from the last search.
/// Never true before the first search.
#[must_use]
pub fn needs_area_search(last: Option<Coordinate>, center: Coordinate, threshold_m: f64) -> bool {
    last.is_some_and(|last| distance(last, center) > threshold_m)
}

struct Inner<C, P> {
    catalog: C,
    location: LocationSource<P>,
    settings: PipelineSettings,
    state: watch::Sender<MapState>,
    cache: Mutex<NearbyCache>,
    /// Set by the first search of any kind; live fixes only auto-search while clear.
    auto_search_done: AtomicBool,
    searches_in_flight: AtomicUsize,
    load_task: Mutex<Option<tokio::task::AbortHandle>>,
}

/// Ranking pipeline for one map session. Cheap to clone; clones share state.
pub struct RankingPipeline<C, P> {
    inner: Arc<Inner<C, P>>,
}

impl<C, P> Clone for RankingPipeline<C, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Running initial-load task. Dropping it stops location tracking.
#[derive(Debug)]
pub struct PipelineHandle {
    task: JoinHandle<()>,
}

impl PipelineHandle {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Counts one running search for as long as it is held.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C, P> RankingPipeline<C, P>
where
    C: StoreProvider + 'static,
    P: LocationPlatform,
{
    #[must_use]
    pub fn new(catalog: C, location: LocationSource<P>, settings: PipelineSettings) -> Self {
        let (state, _) = watch::channel(MapState::new(location.fallback()));
        Self {
            inner: Arc::new(Inner {
                catalog,
                location,
                settings,
                state,
                cache: Mutex::new(NearbyCache::new(settings.cache_radius_m)),
                auto_search_done: AtomicBool::new(false),
                searches_in_flight: AtomicUsize::new(0),
                load_task: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MapState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> MapState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn settings(&self) -> PipelineSettings {
        self.inner.settings
    }

    /// Runs the initial load sequence in the background: one search at the
    /// last known location, then live tracking. Restarting replaces any
    /// previous load task.
    #[must_use]
    pub fn start(&self) -> PipelineHandle {
        let pipeline = self.clone();
        let task = tokio::spawn(async move { pipeline.initial_load().await });
        if let Some(previous) = lock(&self.inner.load_task).replace(task.abort_handle()) {
            previous.abort();
        }
        PipelineHandle { task }
    }

    /// Re-runs the initial load after the host obtains location permission.
    #[must_use]
    pub fn on_permission_granted(&self) -> PipelineHandle {
        tracing::info!("location permission granted, restarting initial load");
        self.start()
    }

    /// User-initiated search at `center`. Enters manual-search mode.
    pub async fn search(&self, center: Coordinate) {
        self.inner
            .state
            .send_modify(|state| state.is_manual_search = true);
        self.run_search(center).await;
    }

    /// Leaves manual-search mode and searches at the current location.
    pub async fn return_to_current_location(&self) {
        self.inner
            .state
            .send_modify(|state| state.is_manual_search = false);
        let here = self.inner.state.borrow().current_location;
        self.run_search(here).await;
    }

    pub fn select_store(&self, store_id: Option<String>) {
        self.inner
            .state
            .send_modify(|state| state.selected_store_id = store_id);
    }

    #[must_use]
    pub fn should_offer_area_search(&self, map_center: Coordinate) -> bool {
        let last = self.inner.state.borrow().last_searched;
        needs_area_search(last, map_center, self.inner.settings.area_search_threshold_m)
    }

    /// Registers for live fixes, then reads the last known location while
    /// the update loop runs. Whichever location arrives first may trigger
    /// the single automatic search.
    async fn initial_load(&self) {
        self.inner.state.send_modify(|state| state.is_loading = true);

        if !self.inner.location.has_permission() {
            tracing::info!("location permission missing, showing placeholder");
            self.inner
                .state
                .send_modify(|state| state.is_location_available = false);
            self.settle_loading();
            return;
        }

        let mut updates = self.inner.location.updates();
        let live_fix_seen = AtomicBool::new(false);

        let last_known = async {
            let here = self.inner.location.last_known().await;
            if live_fix_seen.load(Ordering::SeqCst) {
                tracing::debug!(%here, "live fix arrived first, ignoring last known location");
                self.settle_loading();
                return;
            }
            let manual = self.track_location(here);
            if self.claim_auto_search(manual) {
                self.run_search(here).await;
            } else {
                self.settle_loading();
            }
        };

        let tracking = async {
            while let Some(coordinate) = updates.next().await {
                live_fix_seen.store(true, Ordering::SeqCst);
                let manual = self.track_location(coordinate);
                if self.claim_auto_search(manual) {
                    tracing::debug!(%coordinate, "first location fix, searching");
                    self.run_search(coordinate).await;
                }
            }
            tracing::debug!("location updates ended");
        };

        tokio::join!(last_known, tracking);
    }

    /// Takes the one-shot automatic search unless manual mode is on.
    fn claim_auto_search(&self, manual: bool) -> bool {
        !manual && !self.inner.auto_search_done.swap(true, Ordering::SeqCst)
    }

    fn searches_running(&self) -> bool {
        self.inner.searches_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Clears the loading flag unless a search is still running.
    fn settle_loading(&self) {
        let busy = self.searches_running();
        self.inner.state.send_modify(|state| state.is_loading = busy);
    }

    /// Records a fix as the current location; returns the manual-search flag.
    fn track_location(&self, coordinate: Coordinate) -> bool {
        let mut manual = false;
        self.inner.state.send_modify(|state| {
            state.current_location = coordinate;
            state.is_location_available = true;
            manual = state.is_manual_search;
        });
        manual
    }

    async fn run_search(&self, center: Coordinate) {
        self.inner.auto_search_done.store(true, Ordering::SeqCst);
        let in_flight = InFlight::enter(&self.inner.searches_in_flight);
        self.inner.state.send_modify(|state| state.is_loading = true);

        let cached = lock(&self.inner.cache).lookup(center);
        let stores = if let Some(stores) = cached {
            tracing::debug!(%center, count = stores.len(), "nearby cache hit");
            stores
        } else {
            let stores = self.inner.catalog.fetch_nearby(center).await;
            lock(&self.inner.cache).store(center, &stores);
            stores
        };

        drop(in_flight);

        let ranking = rank_stores(&stores, center);
        tracing::info!(
            %center,
            total = ranking.stores.len(),
            available = ranking.available_count,
            sold_out = ranking.sold_out_count,
            "search complete"
        );
        self.publish(center, ranking);
    }

    fn publish(&self, center: Coordinate, ranking: Ranking) {
        let message = ranking
            .stores
            .is_empty()
            .then(|| EMPTY_RESULT_MESSAGE.to_string());
        let busy = self.searches_running();
        self.inner.state.send_modify(|state| {
            state.stores = ranking.stores;
            state.store_locations = ranking.locations;
            state.available_count = ranking.available_count;
            state.sold_out_count = ranking.sold_out_count;
            state.is_loading = busy;
            state.last_searched = Some(center);
            state.message = message;
            state.searched_at = Some(Utc::now());
        });
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

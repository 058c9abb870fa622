use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cookiemap_core::{Coordinate, Store, StoreBrand};
use cookiemap_places::StoreProvider;

use super::*;
use crate::location::{LocationSettings, LocationSource, SimulatedPlatform};
use crate::state::SearchPhase;

const GANGNAM: Coordinate = Coordinate::new(37.497_9, 127.027_6);
const SEOLLEUNG: Coordinate = Coordinate::new(37.504_5, 127.049_0);

type Calls = Arc<Mutex<Vec<Coordinate>>>;

struct StubProvider {
    stores: Vec<Store>,
    calls: Calls,
    slow_at: Option<Coordinate>,
}

#[async_trait]
impl StoreProvider for StubProvider {
    async fn fetch_nearby(&self, center: Coordinate) -> Vec<Store> {
        self.calls.lock().unwrap().push(center);
        if self.slow_at == Some(center) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        self.stores.clone()
    }
}

fn store(id: &str, coordinate: Coordinate, stock_count: u32) -> Store {
    Store {
        id: id.to_string(),
        brand: StoreBrand::SevenEleven,
        branch_name: format!("{id}점"),
        coordinate,
        stock_count,
        last_updated: "방금 전".to_string(),
    }
}

fn two_stores() -> Vec<Store> {
    vec![store("far", SEOLLEUNG, 3), store("here", GANGNAM, 0)]
}

struct Harness {
    pipeline: RankingPipeline<StubProvider, SimulatedPlatform>,
    platform: Arc<SimulatedPlatform>,
    calls: Calls,
}

fn harness_with(
    platform: SimulatedPlatform,
    stores: Vec<Store>,
    settings: PipelineSettings,
) -> Harness {
    build_harness(platform, stores, settings, None)
}

fn slow_harness(platform: SimulatedPlatform, slow_at: Coordinate) -> Harness {
    build_harness(
        platform,
        two_stores(),
        PipelineSettings::default(),
        Some(slow_at),
    )
}

fn build_harness(
    platform: SimulatedPlatform,
    stores: Vec<Store>,
    settings: PipelineSettings,
    slow_at: Option<Coordinate>,
) -> Harness {
    let calls = Calls::default();
    let provider = StubProvider {
        stores,
        calls: Arc::clone(&calls),
        slow_at,
    };
    let platform = Arc::new(platform);
    let location = LocationSource::new(Arc::clone(&platform), LocationSettings::default());
    Harness {
        pipeline: RankingPipeline::new(provider, location, settings),
        platform,
        calls,
    }
}

fn harness(platform: SimulatedPlatform) -> Harness {
    harness_with(platform, two_stores(), PipelineSettings::default())
}

fn call_count(calls: &Calls) -> usize {
    calls.lock().unwrap().len()
}

async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn search_publishes_ranked_state() {
    let h = harness(SimulatedPlatform::granted(None));
    h.pipeline.search(GANGNAM).await;

    let state = h.pipeline.snapshot();
    let ids: Vec<&str> = state.stores.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["here", "far"]);
    assert_eq!(state.available_count, 1);
    assert_eq!(state.sold_out_count, 1);
    assert!(!state.is_loading);
    assert_eq!(state.last_searched, Some(GANGNAM));
    assert_eq!(state.store_locations.len(), 2);
    assert!(state.message.is_none());
    assert!(state.searched_at.is_some());
    assert_eq!(state.phase(), SearchPhase::Ready);
}

#[tokio::test]
async fn empty_result_sets_message() {
    let h = harness_with(
        SimulatedPlatform::granted(None),
        Vec::new(),
        PipelineSettings::default(),
    );
    h.pipeline.search(GANGNAM).await;

    let state = h.pipeline.snapshot();
    assert!(state.stores.is_empty());
    assert_eq!(state.message.as_deref(), Some(EMPTY_RESULT_MESSAGE));
    assert!(!state.is_loading);
    assert_eq!(state.phase(), SearchPhase::Ready);
}

#[tokio::test]
async fn user_search_enters_manual_mode() {
    let h = harness(SimulatedPlatform::granted(None));
    assert!(!h.pipeline.snapshot().is_manual_search);
    h.pipeline.search(SEOLLEUNG).await;
    assert!(h.pipeline.snapshot().is_manual_search);
}

#[tokio::test]
async fn return_to_current_location_clears_manual_mode() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    assert!(!h.pipeline.track_location(GANGNAM));
    h.pipeline.search(SEOLLEUNG).await;

    h.pipeline.return_to_current_location().await;

    let state = h.pipeline.snapshot();
    assert!(!state.is_manual_search);
    assert_eq!(state.last_searched, Some(GANGNAM));
    assert_eq!(*h.calls.lock().unwrap(), vec![SEOLLEUNG, GANGNAM]);
}

#[tokio::test]
async fn denied_permission_shows_placeholder_without_search() {
    let h = harness(SimulatedPlatform::denied());
    h.pipeline.initial_load().await;

    let state = h.pipeline.snapshot();
    assert!(!state.is_location_available);
    assert!(!state.is_loading);
    assert_eq!(state.phase(), SearchPhase::Idle);
    assert_eq!(call_count(&h.calls), 0);
    assert_eq!(h.platform.active_registrations(), 0);
}

#[tokio::test]
async fn initial_load_searches_once_at_last_known() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    let _handle = h.pipeline.start();

    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    let state = h.pipeline.snapshot();
    assert!(state.is_location_available);
    assert_eq!(state.current_location, GANGNAM);
    assert_eq!(state.last_searched, Some(GANGNAM));
    assert_eq!(*h.calls.lock().unwrap(), vec![GANGNAM]);
}

#[tokio::test]
async fn live_fixes_update_location_without_searching() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    let _handle = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    for step in 1..=3 {
        let fix = GANGNAM.offset(0.001 * f64::from(step), 0.0);
        assert_eq!(h.platform.push(fix), 1);
        let pipeline = h.pipeline.clone();
        eventually(|| pipeline.snapshot().current_location == fix).await;
    }

    assert_eq!(call_count(&h.calls), 1);
    assert_eq!(h.pipeline.snapshot().last_searched, Some(GANGNAM));
}

#[tokio::test]
async fn manual_mode_survives_live_fixes() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    let _handle = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    h.pipeline.search(SEOLLEUNG).await;
    let fix = GANGNAM.offset(0.002, 0.002);
    h.platform.push(fix);
    let pipeline = h.pipeline.clone();
    eventually(|| pipeline.snapshot().current_location == fix).await;

    let state = h.pipeline.snapshot();
    assert!(state.is_manual_search);
    assert_eq!(state.last_searched, Some(SEOLLEUNG));
    assert_eq!(call_count(&h.calls), 2);
}

#[tokio::test]
async fn fixes_are_tracked_while_initial_search_runs() {
    let h = slow_harness(SimulatedPlatform::granted(Some(GANGNAM)), GANGNAM);
    let _handle = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    assert_eq!(h.platform.push(SEOLLEUNG), 1);
    let pipeline = h.pipeline.clone();
    eventually(|| pipeline.snapshot().current_location == SEOLLEUNG).await;
    assert!(h.pipeline.snapshot().is_loading);

    eventually(|| pipeline.snapshot().last_searched == Some(GANGNAM)).await;
    let state = h.pipeline.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.current_location, SEOLLEUNG);
    assert_eq!(*h.calls.lock().unwrap(), vec![GANGNAM]);

    h.pipeline.return_to_current_location().await;
    assert_eq!(h.pipeline.snapshot().last_searched, Some(SEOLLEUNG));
}

#[tokio::test]
async fn first_live_fix_searches_once_when_last_known_is_slow() {
    let platform = SimulatedPlatform::granted(Some(GANGNAM));
    platform.set_last_location_delay(Duration::from_millis(300));
    let h = harness(platform);
    let _handle = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    let second = SEOLLEUNG.offset(0.001, 0.0);
    assert_eq!(h.platform.push(SEOLLEUNG), 1);
    assert_eq!(h.platform.push(second), 1);
    let pipeline = h.pipeline.clone();
    eventually(|| pipeline.snapshot().current_location == second).await;
    eventually(|| pipeline.snapshot().last_searched == Some(SEOLLEUNG)).await;

    // outlast the delayed last-known read
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(*h.calls.lock().unwrap(), vec![SEOLLEUNG]);
    let state = h.pipeline.snapshot();
    assert_eq!(state.current_location, second);
    assert_eq!(state.last_searched, Some(SEOLLEUNG));
    assert!(!state.is_loading);

    h.pipeline.search(GANGNAM).await;
    let third = GANGNAM.offset(0.002, 0.0);
    h.platform.push(third);
    eventually(|| pipeline.snapshot().current_location == third).await;
    assert_eq!(*h.calls.lock().unwrap(), vec![SEOLLEUNG, GANGNAM]);
}

#[tokio::test]
async fn initial_load_keeps_loading_of_running_user_search() {
    let h = slow_harness(SimulatedPlatform::granted(Some(GANGNAM)), SEOLLEUNG);
    let pipeline = h.pipeline.clone();
    let search = tokio::spawn(async move { pipeline.search(SEOLLEUNG).await });
    let calls = Arc::clone(&h.calls);
    eventually(|| call_count(&calls) == 1).await;

    let _handle = h.pipeline.start();
    let pipeline = h.pipeline.clone();
    eventually(|| pipeline.snapshot().is_location_available).await;

    let state = h.pipeline.snapshot();
    assert!(state.is_manual_search);
    assert!(state.is_loading);
    assert_eq!(call_count(&h.calls), 1);

    search.await.unwrap();
    let state = h.pipeline.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.last_searched, Some(SEOLLEUNG));
}

#[tokio::test]
async fn loading_stays_set_until_last_overlapping_search_finishes() {
    let h = slow_harness(SimulatedPlatform::granted(None), GANGNAM);
    let pipeline = h.pipeline.clone();
    let slow = tokio::spawn(async move { pipeline.search(GANGNAM).await });
    let calls = Arc::clone(&h.calls);
    eventually(|| call_count(&calls) == 1).await;

    h.pipeline.search(SEOLLEUNG).await;
    let state = h.pipeline.snapshot();
    assert_eq!(state.last_searched, Some(SEOLLEUNG));
    assert!(state.is_loading);

    slow.await.unwrap();
    assert!(!h.pipeline.snapshot().is_loading);
}

#[tokio::test]
async fn dropping_handle_releases_location_updates() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    let handle = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    drop(handle);
    eventually(|| platform.active_registrations() == 0).await;
}

#[tokio::test]
async fn permission_grant_restarts_initial_load() {
    let h = harness(SimulatedPlatform::denied());
    h.pipeline.initial_load().await;
    assert_eq!(call_count(&h.calls), 0);

    h.platform.grant_permission();
    h.platform.push(SEOLLEUNG);
    let _handle = h.pipeline.on_permission_granted();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    let state = h.pipeline.snapshot();
    assert!(state.is_location_available);
    assert_eq!(state.last_searched, Some(SEOLLEUNG));
}

#[tokio::test]
async fn restart_replaces_previous_load_task() {
    let h = harness(SimulatedPlatform::granted(Some(GANGNAM)));
    let first = h.pipeline.start();
    let platform = Arc::clone(&h.platform);
    eventually(|| platform.active_registrations() == 1).await;

    let _second = h.pipeline.start();
    eventually(|| first.is_finished()).await;
    eventually(|| platform.active_registrations() == 1).await;
}

#[tokio::test]
async fn last_completion_wins() {
    let calls = Calls::default();
    let provider = StubProvider {
        stores: two_stores(),
        calls: Arc::clone(&calls),
        slow_at: Some(GANGNAM),
    };
    let location = LocationSource::new(
        Arc::new(SimulatedPlatform::granted(None)),
        LocationSettings::default(),
    );
    let pipeline = RankingPipeline::new(provider, location, PipelineSettings::default());

    tokio::join!(pipeline.search(GANGNAM), pipeline.search(SEOLLEUNG));

    assert_eq!(call_count(&calls), 2);
    assert_eq!(pipeline.snapshot().last_searched, Some(GANGNAM));
}

#[tokio::test]
async fn cache_hit_reranks_without_provider_call() {
    let settings = PipelineSettings {
        cache_radius_m: Some(500.0),
        ..PipelineSettings::default()
    };
    let h = harness_with(SimulatedPlatform::granted(None), two_stores(), settings);

    h.pipeline.search(GANGNAM).await;
    let nearby = GANGNAM.offset(0.001, 0.0);
    h.pipeline.search(nearby).await;

    assert_eq!(call_count(&h.calls), 1);
    let state = h.pipeline.snapshot();
    assert_eq!(state.last_searched, Some(nearby));
    let here = state.stores.iter().find(|s| s.id == "here").unwrap();
    assert!(here.distance_m > 100.0);

    h.pipeline.search(SEOLLEUNG).await;
    assert_eq!(call_count(&h.calls), 2);
}

#[tokio::test]
async fn select_store_records_selection() {
    let h = harness(SimulatedPlatform::granted(None));
    h.pipeline.search(GANGNAM).await;

    h.pipeline.select_store(Some("far".to_string()));
    let state = h.pipeline.snapshot();
    assert_eq!(state.selected_store().map(|s| s.id.as_str()), Some("far"));

    h.pipeline.select_store(None);
    assert!(h.pipeline.snapshot().selected_store_id.is_none());
}

#[tokio::test]
async fn area_search_offered_after_drift() {
    let h = harness(SimulatedPlatform::granted(None));
    assert!(!h.pipeline.should_offer_area_search(SEOLLEUNG));

    h.pipeline.search(GANGNAM).await;
    // ~220 m and ~330 m north
    assert!(!h.pipeline.should_offer_area_search(GANGNAM.offset(0.002, 0.0)));
    assert!(h.pipeline.should_offer_area_search(GANGNAM.offset(0.003, 0.0)));
}

#[tokio::test]
async fn subscribers_see_published_state() {
    let h = harness(SimulatedPlatform::granted(None));
    let mut rx = h.pipeline.subscribe();
    h.pipeline.search(GANGNAM).await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.available_count, 1);
}

#[test]
fn needs_area_search_is_false_before_first_search() {
    assert!(!needs_area_search(None, SEOLLEUNG, 300.0));
    assert!(needs_area_search(Some(GANGNAM), SEOLLEUNG, 300.0));
    assert!(!needs_area_search(Some(GANGNAM), GANGNAM, 300.0));
}

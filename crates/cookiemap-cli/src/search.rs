//! `search` command and the shared pipeline wiring.

use std::sync::Arc;

use cookiemap_core::{AppConfig, Coordinate, StockLevel};
use cookiemap_pipeline::{
    LocationSettings, LocationSource, MapState, PipelineSettings, RankingPipeline,
    SimulatedPlatform,
};
use cookiemap_places::{PlacesClient, StoreCatalog};

pub(crate) type CliPipeline = RankingPipeline<StoreCatalog<PlacesClient>, SimulatedPlatform>;

/// Builds the store catalog. Without an API key only generated stores are served.
///
/// # Errors
///
/// Returns an error if the Places HTTP client cannot be built.
pub(crate) fn build_catalog(config: &AppConfig) -> anyhow::Result<StoreCatalog<PlacesClient>> {
    let live = match config.places_api_key.as_deref() {
        Some(key) => Some(PlacesClient::with_base_url(
            key,
            config.places_timeout_secs,
            &config.user_agent,
            &config.places_base_url,
        )?),
        None => {
            tracing::warn!("GOOGLE_PLACES_API_KEY not set, serving generated stores");
            None
        }
    };
    Ok(StoreCatalog::new(live)
        .with_radius(config.search_radius_m)
        .with_max_results(config.max_results))
}

pub(crate) fn build_pipeline(
    config: &AppConfig,
    platform: Arc<SimulatedPlatform>,
) -> anyhow::Result<CliPipeline> {
    let location = LocationSource::new(platform, LocationSettings::from_config(config))
        .with_fallback(config.fallback_coordinate);
    Ok(RankingPipeline::new(
        build_catalog(config)?,
        location,
        PipelineSettings::from_config(config),
    ))
}

/// Runs one search at `origin`, or at the fallback coordinate.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built or JSON output fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    origin: Option<Coordinate>,
    json: bool,
) -> anyhow::Result<()> {
    let platform = Arc::new(SimulatedPlatform::granted(origin));
    let pipeline = build_pipeline(config, platform)?;
    let center = origin.unwrap_or(config.fallback_coordinate);

    pipeline.search(center).await;
    let state = pipeline.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_state(&state);
    }
    Ok(())
}

/// One-line summary of a published state.
pub(crate) fn status_line(state: &MapState) -> String {
    if !state.is_location_available && !state.is_loading && state.last_searched.is_none() {
        return "위치 권한이 필요합니다".to_string();
    }
    let phase = if state.is_loading { "검색 중" } else { "완료" };
    let mode = if state.is_manual_search { " (수동)" } else { "" };
    format!(
        "[{phase}{mode}] 현재 위치 {}  재고 있음 {} / 품절 {}",
        state.current_location, state.available_count, state.sold_out_count
    )
}

pub(crate) fn print_state(state: &MapState) {
    if let Some(center) = state.last_searched {
        println!(
            "검색 위치: {center}  재고 있음 {} / 품절 {}",
            state.available_count, state.sold_out_count
        );
    }
    if let Some(message) = &state.message {
        println!("{message}");
        return;
    }

    println!(
        "{:>3}  {:<28} {:>8}  {:<10} {:<10} {}",
        "#", "매장", "거리", "재고", "상태", "업데이트"
    );
    for (rank, store) in state.stores.iter().enumerate() {
        println!(
            "{:>3}  {:<28} {:>8}  {:<10} {:<10} {}",
            rank + 1,
            format!("{} {}", store.glyph, store.full_name),
            store.distance_label,
            StockLevel::badge_text(store.stock_count),
            store.stock_level.label(),
            store.last_updated
        );
    }
}

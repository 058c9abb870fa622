//! Nearby-store ranking pipeline.
//!
//! Ties a [`LocationSource`] and a [`StoreProvider`](cookiemap_places::StoreProvider)
//! together and publishes a distance-sorted [`MapState`] through a
//! `tokio::sync::watch` channel.

pub mod cache;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod rank;
pub mod state;

pub use cache::NearbyCache;
pub use error::LocationError;
pub use location::{
    LocationPlatform, LocationSettings, LocationSource, LocationUpdates, RegistrationId,
    SimulatedPlatform,
};
pub use pipeline::{needs_area_search, PipelineHandle, PipelineSettings, RankingPipeline};
pub use rank::{rank_stores, RankedStore, Ranking};
pub use state::{MapState, SearchPhase, EMPTY_RESULT_MESSAGE};

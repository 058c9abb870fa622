//! Best-effort device location.
//!
//! [`LocationSource`] wraps a host [`LocationPlatform`] and never reports
//! absence: missing permission, a missing fix, or a platform error all yield
//! the configured fallback coordinate. Permission denial is terminal here;
//! the caller re-invokes after obtaining permission.

mod simulated;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use cookiemap_core::{AppConfig, Coordinate, FALLBACK_COORDINATE};
use futures::Stream;
use tokio::sync::mpsc;

use crate::error::LocationError;

pub use simulated::SimulatedPlatform;

/// Channel a platform pushes live fixes into.
pub type UpdateSink = mpsc::UnboundedSender<Coordinate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettings {
    /// Desired interval between fixes.
    pub interval: Duration,
    /// Fastest interval the consumer accepts.
    pub min_interval: Duration,
    pub high_accuracy: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            min_interval: Duration::from_secs(5),
            high_accuracy: true,
        }
    }
}

impl LocationSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.location_interval_secs),
            min_interval: Duration::from_secs(config.location_min_interval_secs),
            high_accuracy: true,
        }
    }
}

/// Host location service.
#[async_trait]
pub trait LocationPlatform: Send + Sync + 'static {
    /// Whether fine or coarse location permission is currently granted.
    fn has_permission(&self) -> bool;

    /// Last fix the platform knows about, if any.
    async fn last_location(&self) -> Result<Option<Coordinate>, LocationError>;

    /// Starts delivering fixes into `sink` until [`remove_updates`](Self::remove_updates).
    fn request_updates(
        &self,
        settings: &LocationSettings,
        sink: UpdateSink,
    ) -> Result<RegistrationId, LocationError>;

    fn remove_updates(&self, id: RegistrationId);
}

pub struct LocationSource<P> {
    platform: Arc<P>,
    settings: LocationSettings,
    fallback: Coordinate,
}

impl<P: LocationPlatform> LocationSource<P> {
    #[must_use]
    pub fn new(platform: Arc<P>, settings: LocationSettings) -> Self {
        Self {
            platform,
            settings,
            fallback: FALLBACK_COORDINATE,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    #[must_use]
    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    #[must_use]
    pub fn has_permission(&self) -> bool {
        self.platform.has_permission()
    }

    /// Single best-effort read; the fallback coordinate stands in for any absence.
    pub async fn last_known(&self) -> Coordinate {
        if !self.platform.has_permission() {
            tracing::debug!(fallback = %self.fallback, "no location permission, using fallback");
            return self.fallback;
        }
        match self.platform.last_location().await {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                tracing::debug!(fallback = %self.fallback, "platform has no last location");
                self.fallback
            }
            Err(e) => {
                tracing::warn!(error = %e, fallback = %self.fallback, "last location read failed");
                self.fallback
            }
        }
    }

    /// Live fixes. Without permission (or if registration fails) the stream
    /// yields the fallback coordinate once and ends. Dropping the stream
    /// deregisters from the platform.
    #[must_use]
    pub fn updates(&self) -> LocationUpdates<P> {
        let (tx, rx) = mpsc::unbounded_channel();
        let updates = LocationUpdates {
            rx,
            registration: self.register(tx.clone()),
        };
        if !updates.is_registered() {
            tx.send(self.fallback).ok();
        }
        updates
    }

    fn register(&self, sink: UpdateSink) -> Option<(Arc<P>, RegistrationId)> {
        if !self.platform.has_permission() {
            tracing::debug!(fallback = %self.fallback, "no location permission, updates use fallback");
            return None;
        }
        match self.platform.request_updates(&self.settings, sink) {
            Ok(id) => {
                tracing::debug!(registration = id.0, "location updates registered");
                Some((Arc::clone(&self.platform), id))
            }
            Err(e) => {
                tracing::warn!(error = %e, "location update registration failed, using fallback");
                None
            }
        }
    }
}

/// Stream of live fixes. Deregisters from the platform on drop.
pub struct LocationUpdates<P: LocationPlatform> {
    rx: mpsc::UnboundedReceiver<Coordinate>,
    registration: Option<(Arc<P>, RegistrationId)>,
}

impl<P: LocationPlatform> LocationUpdates<P> {
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }
}

impl<P: LocationPlatform> Stream for LocationUpdates<P> {
    type Item = Coordinate;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<P: LocationPlatform> Drop for LocationUpdates<P> {
    fn drop(&mut self) {
        if let Some((platform, id)) = self.registration.take() {
            platform.remove_updates(id);
            tracing::debug!(registration = id.0, "location updates released");
        }
    }
}

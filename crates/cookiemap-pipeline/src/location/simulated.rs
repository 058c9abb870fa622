//! In-process [`LocationPlatform`] driven by explicit pushes or a scripted route.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cookiemap_core::Coordinate;

use super::{LocationPlatform, LocationSettings, RegistrationId, UpdateSink};
use crate::error::LocationError;

pub struct SimulatedPlatform {
    permission: AtomicBool,
    last: Mutex<Option<Coordinate>>,
    sinks: Mutex<HashMap<RegistrationId, UpdateSink>>,
    next_id: AtomicU64,
    fail_registrations: AtomicBool,
    last_location_delay: Mutex<Duration>,
}

impl SimulatedPlatform {
    #[must_use]
    pub fn granted(last: Option<Coordinate>) -> Self {
        Self {
            permission: AtomicBool::new(true),
            last: Mutex::new(last),
            sinks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            fail_registrations: AtomicBool::new(false),
            last_location_delay: Mutex::new(Duration::ZERO),
        }
    }

    #[must_use]
    pub fn denied() -> Self {
        let platform = Self::granted(None);
        platform.permission.store(false, Ordering::SeqCst);
        platform
    }

    pub fn grant_permission(&self) {
        self.permission.store(true, Ordering::SeqCst);
    }

    pub fn revoke_permission(&self) {
        self.permission.store(false, Ordering::SeqCst);
    }

    /// Makes subsequent `request_updates` calls fail.
    pub fn fail_registrations(&self, fail: bool) {
        self.fail_registrations.store(fail, Ordering::SeqCst);
    }

    /// Delays every `last_location` answer by `delay`, like a slow first fix.
    pub fn set_last_location_delay(&self, delay: Duration) {
        *lock(&self.last_location_delay) = delay;
    }

    /// Records `coordinate` as the last fix and delivers it to every active
    /// registration. Returns how many registrations received it.
    pub fn push(&self, coordinate: Coordinate) -> usize {
        *lock(&self.last) = Some(coordinate);
        let mut sinks = lock(&self.sinks);
        sinks.retain(|_, sink| sink.send(coordinate).is_ok());
        sinks.len()
    }

    #[must_use]
    pub fn active_registrations(&self) -> usize {
        lock(&self.sinks).len()
    }

    /// Pushes each point of `route` in order, `step` apart, once something
    /// has registered for updates. Returns early when permission is absent.
    pub async fn play_route(self: Arc<Self>, route: Vec<Coordinate>, step: Duration) {
        let poll = step.min(Duration::from_millis(50));
        while self.active_registrations() == 0 {
            if !self.permission.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(poll).await;
        }
        for coordinate in route {
            let delivered = self.push(coordinate);
            tracing::debug!(%coordinate, delivered, "simulated location fix");
            tokio::time::sleep(step).await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl LocationPlatform for SimulatedPlatform {
    fn has_permission(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    async fn last_location(&self) -> Result<Option<Coordinate>, LocationError> {
        let delay = *lock(&self.last_location_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if !self.has_permission() {
            return Err(LocationError::PermissionDenied);
        }
        Ok(*lock(&self.last))
    }

    fn request_updates(
        &self,
        settings: &LocationSettings,
        sink: UpdateSink,
    ) -> Result<RegistrationId, LocationError> {
        if !self.has_permission() {
            return Err(LocationError::PermissionDenied);
        }
        if self.fail_registrations.load(Ordering::SeqCst) {
            return Err(LocationError::Unavailable(
                "location services disabled".to_string(),
            ));
        }
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        tracing::debug!(
            registration = id.0,
            interval_ms = settings.interval.as_millis(),
            high_accuracy = settings.high_accuracy,
            "simulated updates requested"
        );
        lock(&self.sinks).insert(id, sink);
        Ok(id)
    }

    fn remove_updates(&self, id: RegistrationId) {
        lock(&self.sinks).remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn denied_platform_refuses_everything() {
        let platform = SimulatedPlatform::denied();
        assert!(!platform.has_permission());
        assert!(matches!(
            platform.last_location().await,
            Err(LocationError::PermissionDenied)
        ));
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(platform
            .request_updates(&LocationSettings::default(), tx)
            .is_err());
    }

    #[tokio::test]
    async fn push_updates_last_location() {
        let platform = SimulatedPlatform::granted(None);
        let here = Coordinate::new(1.0, 2.0);
        assert_eq!(platform.push(here), 0);
        assert_eq!(platform.last_location().await.unwrap(), Some(here));
    }

    #[tokio::test]
    async fn closed_sinks_are_pruned_on_push() {
        let platform = SimulatedPlatform::granted(None);
        let (tx, rx) = mpsc::unbounded_channel();
        platform
            .request_updates(&LocationSettings::default(), tx)
            .unwrap();
        drop(rx);
        assert_eq!(platform.push(Coordinate::new(0.0, 0.0)), 0);
        assert_eq!(platform.active_registrations(), 0);
    }

    #[tokio::test]
    async fn play_route_returns_without_permission() {
        let platform = Arc::new(SimulatedPlatform::denied());
        platform
            .play_route(vec![Coordinate::new(0.0, 0.0)], Duration::from_millis(1))
            .await;
    }

    #[tokio::test]
    async fn play_route_delivers_points_in_order() {
        let platform = Arc::new(SimulatedPlatform::granted(None));
        let (tx, mut rx) = mpsc::unbounded_channel();
        platform
            .request_updates(&LocationSettings::default(), tx)
            .unwrap();
        let route = vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)];
        Arc::clone(&platform)
            .play_route(route.clone(), Duration::from_millis(1))
            .await;
        assert_eq!(rx.recv().await, Some(route[0]));
        assert_eq!(rx.recv().await, Some(route[1]));
    }
}

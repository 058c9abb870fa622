use thiserror::Error;

/// Failures reported by a [`LocationPlatform`](crate::LocationPlatform).
///
/// [`LocationSource`](crate::LocationSource) absorbs all of them by answering
/// with the fallback coordinate.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location permission not granted")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

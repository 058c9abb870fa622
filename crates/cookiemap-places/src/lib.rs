pub mod catalog;
pub mod client;
pub mod error;
pub mod mock;
pub mod stock;
pub mod types;

pub use catalog::{NearbySearch, StoreCatalog, StoreProvider};
pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::{NearbyRequest, RawPlace};

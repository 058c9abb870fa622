//! Nearby-search request/response types.
//!
//! [`NearbyRequest`] and [`RawPlace`] are the provider-neutral shapes the
//! catalog works with; the `pub(crate)` wire structs mirror the Places API
//! `places:searchNearby` JSON.

use cookiemap_core::Coordinate;
use serde::{Deserialize, Serialize};

pub const SEARCH_RADIUS_METERS: f64 = 1000.0;
pub const MAX_RESULT_COUNT: u32 = 20;

/// Place categories a nearby search is restricted to.
pub const STORE_CATEGORIES: &[&str] = &["convenience_store", "bakery", "cafe"];

/// Field mask sent with every nearby search.
pub const PLACE_FIELDS: &[&str] = &[
    "places.id",
    "places.displayName",
    "places.formattedAddress",
    "places.location",
    "places.types",
];

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub center: Coordinate,
    pub radius_m: f64,
    pub included_types: Vec<String>,
    pub max_results: u32,
}

impl NearbyRequest {
    /// Store search around `center` with the default radius, categories and cap.
    #[must_use]
    pub fn stores_around(center: Coordinate) -> Self {
        Self {
            center,
            radius_m: SEARCH_RADIUS_METERS,
            included_types: STORE_CATEGORIES.iter().map(|t| (*t).to_string()).collect(),
            max_results: MAX_RESULT_COUNT,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

/// A place record as returned by the provider, before brand classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub formatted_address: Option<String>,
    pub location: Option<Coordinate>,
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNearbyBody<'a> {
    pub included_types: &'a [String],
    pub max_result_count: u32,
    pub location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
pub(crate) struct Circle {
    pub center: Coordinate,
    pub radius: f64,
}

impl<'a> From<&'a NearbyRequest> for SearchNearbyBody<'a> {
    fn from(request: &'a NearbyRequest) -> Self {
        Self {
            included_types: &request.included_types,
            max_result_count: request.max_results,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: request.center,
                    radius: request.radius_m,
                },
            },
        }
    }
}

/// `places:searchNearby` response. An empty result is `{}`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceRecord {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedText {
    pub text: String,
}

impl From<PlaceRecord> for RawPlace {
    fn from(record: PlaceRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.map(|d| d.text),
            formatted_address: record.formatted_address,
            location: record.location,
            types: record.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_around_uses_default_filters() {
        let req = NearbyRequest::stores_around(Coordinate::new(37.5, 127.0));
        assert!((req.radius_m - 1000.0).abs() < f64::EPSILON);
        assert_eq!(req.max_results, 20);
        assert_eq!(req.included_types, vec!["convenience_store", "bakery", "cafe"]);
    }

    #[test]
    fn body_serializes_in_places_api_shape() {
        let req = NearbyRequest::stores_around(Coordinate::new(37.5, 127.0)).with_max_results(5);
        let body = serde_json::to_value(SearchNearbyBody::from(&req)).unwrap();
        assert_eq!(body["maxResultCount"], 5);
        assert_eq!(body["includedTypes"][0], "convenience_store");
        assert_eq!(body["locationRestriction"]["circle"]["center"]["latitude"], 37.5);
        assert_eq!(body["locationRestriction"]["circle"]["radius"], 1000.0);
    }

    #[test]
    fn empty_response_object_has_no_places() {
        let resp: SearchNearbyResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.places.is_empty());
    }

    #[test]
    fn place_record_converts_display_name_text() {
        let record: PlaceRecord = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "displayName": { "text": "GS25 강남점", "languageCode": "ko" },
            "location": { "latitude": 37.5, "longitude": 127.0 }
        }))
        .unwrap();
        let place = RawPlace::from(record);
        assert_eq!(place.id.as_deref(), Some("abc"));
        assert_eq!(place.display_name.as_deref(), Some("GS25 강남점"));
        assert_eq!(place.location, Some(Coordinate::new(37.5, 127.0)));
        assert!(place.types.is_empty());
        assert!(place.formatted_address.is_none());
    }
}

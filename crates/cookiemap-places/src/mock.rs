//! Generated stores used when the live provider has nothing to offer.

use cookiemap_core::{Coordinate, Store, StoreBrand};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::stock::{sample_stock, sample_update_label};

/// Width of the square (in degrees, per axis) mock stores are scattered in,
/// centered on the query point.
pub const MOCK_OFFSET_SPAN_DEGREES: f64 = 0.015;

/// Brands and branch names expanded into one store per branch.
pub const MOCK_TABLE: &[(StoreBrand, &[&str])] = &[
    (
        StoreBrand::Cu,
        &["강남대로점", "역삼역점", "삼성역점", "선릉역점"],
    ),
    (StoreBrand::Gs25, &["테헤란로점", "강남역점", "삼성중앙점"]),
    (StoreBrand::SevenEleven, &["강남점", "역삼점"]),
    (StoreBrand::Starbucks, &["강남R점", "역삼역점", "삼성타워점"]),
    (StoreBrand::Twosome, &["강남역점", "테헤란로점"]),
    (StoreBrand::Ediya, &["강남점", "역삼역점"]),
    (StoreBrand::ParisBaguette, &["강남역점", "삼성점"]),
    (StoreBrand::MegaCoffee, &["강남점", "역삼점"]),
];

/// Expands [`MOCK_TABLE`] around `center`, shuffles, and keeps at most `limit` stores.
pub fn generate_mock_stores<R: Rng + ?Sized>(
    center: Coordinate,
    limit: usize,
    rng: &mut R,
) -> Vec<Store> {
    let mut stores: Vec<Store> = MOCK_TABLE
        .iter()
        .flat_map(|(brand, branches)| branches.iter().map(move |branch| (*brand, *branch)))
        .enumerate()
        .map(|(index, (brand, branch))| {
            let d_lat = (rng.random::<f64>() - 0.5) * MOCK_OFFSET_SPAN_DEGREES;
            let d_lng = (rng.random::<f64>() - 0.5) * MOCK_OFFSET_SPAN_DEGREES;
            Store {
                id: format!("mock_{index}"),
                brand,
                branch_name: branch.to_string(),
                coordinate: center.offset(d_lat, d_lng),
                stock_count: sample_stock(rng),
                last_updated: sample_update_label(rng),
            }
        })
        .collect();

    stores.shuffle(rng);
    stores.truncate(limit);
    stores
}

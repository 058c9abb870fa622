use serde::{Deserialize, Serialize};

use crate::brand::StoreBrand;
use crate::geo::Coordinate;

/// A store returned by one nearby search.
///
/// Ids are unique within a result set only; mock-generated ids repeat across
/// searches and carry no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub brand: StoreBrand,
    pub branch_name: String,
    pub coordinate: Coordinate,
    pub stock_count: u32,
    /// Relative-time label such as "5분 전". Not comparable across stores.
    pub last_updated: String,
}

impl Store {
    /// Brand display name followed by the branch name, e.g. "CU 강남대로점".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.brand.display_name(), self.branch_name)
    }

    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.stock_count == 0
    }

    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::from_count(self.stock_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    High,
    Medium,
    Low,
    SoldOut,
}

impl StockLevel {
    #[must_use]
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => StockLevel::SoldOut,
            1..=4 => StockLevel::Low,
            5..=9 => StockLevel::Medium,
            _ => StockLevel::High,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::High => "재고 충분",
            StockLevel::Medium => "재고 보통",
            StockLevel::Low => "품절 임박",
            StockLevel::SoldOut => "품절",
        }
    }

    /// Badge text for a stock count: "품절" when sold out, else "<n>개 남음".
    #[must_use]
    pub fn badge_text(count: u32) -> String {
        if count == 0 {
            StockLevel::SoldOut.label().to_string()
        } else {
            format!("{count}개 남음")
        }
    }
}

//! Store brands and the ordered keyword table used to classify place names.
//!
//! Classification walks [`BRAND_RULES`] top to bottom and the first rule whose
//! detection pattern matches wins, so specific franchises sit above the
//! generic cafe/bakery buckets.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBrand {
    Cu,
    Gs25,
    SevenEleven,
    Emart24,
    ParisBaguette,
    TousLesJours,
    Bakery,
    Starbucks,
    PaulBassett,
    Twosome,
    Ediya,
    MegaCoffee,
    Compose,
    Paiks,
    Hollys,
    Angelinus,
    Cafe,
    Other,
}

impl StoreBrand {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            StoreBrand::Cu => "CU",
            StoreBrand::Gs25 => "GS25",
            StoreBrand::SevenEleven => "세븐일레븐",
            StoreBrand::Emart24 => "이마트24",
            StoreBrand::ParisBaguette => "파리바게뜨",
            StoreBrand::TousLesJours => "뚜레쥬르",
            StoreBrand::Bakery => "동네 빵집",
            StoreBrand::Starbucks => "스타벅스",
            StoreBrand::PaulBassett => "폴바셋",
            StoreBrand::Twosome => "투썸플레이스",
            StoreBrand::Ediya => "이디야",
            StoreBrand::MegaCoffee => "메가커피",
            StoreBrand::Compose => "컴포즈커피",
            StoreBrand::Paiks => "빽다방",
            StoreBrand::Hollys => "할리스",
            StoreBrand::Angelinus => "엔제리너스",
            StoreBrand::Cafe => "카페",
            StoreBrand::Other => "기타",
        }
    }

    /// Single-glyph marker shown next to the brand name.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            StoreBrand::Cu => "🏪",
            StoreBrand::Gs25 => "🏬",
            StoreBrand::SevenEleven => "7️⃣",
            StoreBrand::Emart24 => "🛒",
            StoreBrand::ParisBaguette => "🥐",
            StoreBrand::TousLesJours => "🥖",
            StoreBrand::Bakery => "🍞",
            StoreBrand::Twosome => "🍰",
            StoreBrand::MegaCoffee => "🥤",
            StoreBrand::Paiks => "🧋",
            StoreBrand::Starbucks
            | StoreBrand::PaulBassett
            | StoreBrand::Ediya
            | StoreBrand::Compose
            | StoreBrand::Hollys
            | StoreBrand::Angelinus
            | StoreBrand::Cafe => "☕",
            StoreBrand::Other => "🏠",
        }
    }
}

impl std::fmt::Display for StoreBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the brand classification table.
///
/// `detect` and `strip` are regex fragments matched case-insensitively.
/// An empty `strip` list keeps the full display name as the branch name.
#[derive(Debug, Clone, Copy)]
pub struct BrandRule {
    pub brand: StoreBrand,
    pub detect: &'static [&'static str],
    pub strip: &'static [&'static str],
}

pub const BRAND_RULES: &[BrandRule] = &[
    BrandRule {
        brand: StoreBrand::Cu,
        detect: &["CU", "씨유"],
        strip: &["CU", "씨유"],
    },
    BrandRule {
        brand: StoreBrand::Gs25,
        detect: &["GS25", "지에스"],
        strip: &["GS25", "GS 25", "지에스"],
    },
    BrandRule {
        brand: StoreBrand::SevenEleven,
        detect: &["세븐일레븐", "7-ELEVEN", "SEVEN"],
        strip: &["세븐일레븐", "7-ELEVEN", "SEVEN.?ELEVEN"],
    },
    BrandRule {
        brand: StoreBrand::Emart24,
        detect: &["이마트24", "EMART"],
        strip: &["이마트24", "EMART.?24"],
    },
    BrandRule {
        brand: StoreBrand::ParisBaguette,
        detect: &["파리바게뜨", "PARIS"],
        strip: &["파리바게뜨", "PARIS.?BAGUETTE"],
    },
    BrandRule {
        brand: StoreBrand::TousLesJours,
        detect: &["뚜레쥬르", "TOUS"],
        strip: &["뚜레쥬르", "TOUS.?LES.?JOURS"],
    },
    BrandRule {
        brand: StoreBrand::Starbucks,
        detect: &["스타벅스", "STARBUCKS"],
        strip: &["스타벅스", "STARBUCKS"],
    },
    BrandRule {
        brand: StoreBrand::PaulBassett,
        detect: &["폴바셋", "PAUL.*BASSETT", "BASSETT.*PAUL"],
        strip: &["폴바셋", "PAUL.?BASSETT"],
    },
    BrandRule {
        brand: StoreBrand::Twosome,
        detect: &["투썸", "TWOSOME", "TWO SOME"],
        strip: &["투썸플레이스", "투썸", "TWOSOME", "TWO.?SOME"],
    },
    BrandRule {
        brand: StoreBrand::Ediya,
        detect: &["이디야", "EDIYA"],
        strip: &["이디야", "EDIYA"],
    },
    BrandRule {
        brand: StoreBrand::MegaCoffee,
        detect: &["메가", "MEGA"],
        strip: &["메가커피", "메가MGC커피", "MEGA"],
    },
    BrandRule {
        brand: StoreBrand::Compose,
        detect: &["컴포즈", "COMPOSE"],
        strip: &["컴포즈커피", "컴포즈", "COMPOSE"],
    },
    BrandRule {
        brand: StoreBrand::Paiks,
        detect: &["빽다방", "PAIK"],
        strip: &["빽다방", "PAIK"],
    },
    BrandRule {
        brand: StoreBrand::Hollys,
        detect: &["할리스", "HOLLYS"],
        strip: &["할리스", "HOLLYS"],
    },
    BrandRule {
        brand: StoreBrand::Angelinus,
        detect: &["엔제리너스", "ANGEL"],
        strip: &["엔제리너스", "ANGELINUS", "ANGEL.?IN.?US"],
    },
    BrandRule {
        brand: StoreBrand::Cafe,
        detect: &["카페", "CAFE", "커피", "COFFEE"],
        strip: &[],
    },
    BrandRule {
        brand: StoreBrand::Bakery,
        detect: &["베이커리", "BAKERY", "빵집", "제과"],
        strip: &[],
    },
];

struct CompiledRule {
    brand: StoreBrand,
    detect: Regex,
    strip: Option<Regex>,
}

fn case_insensitive_alternation(patterns: &[&str]) -> Regex {
    Regex::new(&format!("(?i)(?:{})", patterns.join("|"))).expect("valid regex")
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    BRAND_RULES
        .iter()
        .map(|rule| CompiledRule {
            brand: rule.brand,
            detect: case_insensitive_alternation(rule.detect),
            strip: (!rule.strip.is_empty()).then(|| case_insensitive_alternation(rule.strip)),
        })
        .collect()
});

/// Classifies a place display name into a brand and a branch name.
///
/// Franchise keywords are removed from the branch name; generic buckets and
/// unmatched names keep the full display name, the latter under
/// [`StoreBrand::Other`].
#[must_use]
pub fn match_brand(display_name: &str) -> (StoreBrand, String) {
    for rule in COMPILED_RULES.iter() {
        if !rule.detect.is_match(display_name) {
            continue;
        }
        let branch = match &rule.strip {
            Some(strip) => strip.replace_all(display_name, "").trim().to_string(),
            None => display_name.to_string(),
        };
        return (rule.brand, branch);
    }
    (StoreBrand::Other, display_name.to_string())
}

#[cfg(test)]
#[path = "brand_test.rs"]
mod tests;

//! Monster domain types
//!
//! Product categories, rarity tiers, elemental attributes, and the entity shapes
//! that travel between the deriver, the ledger, and the presentation boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dairy product category as labelled on Japanese packaging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 牛乳 - raw/whole milk
    #[serde(rename = "牛乳")]
    Milk,
    /// 加工乳 - processed milk
    #[serde(rename = "加工乳")]
    ProcessedMilk,
    /// 乳飲料 - milk beverage
    #[serde(rename = "乳飲料")]
    MilkBeverage,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Milk,
        Category::ProcessedMilk,
        Category::MilkBeverage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Milk => "牛乳",
            Category::ProcessedMilk => "加工乳",
            Category::MilkBeverage => "乳飲料",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            Category::Milk => Rarity::Epic,
            Category::ProcessedMilk => Rarity::Evolved,
            Category::MilkBeverage => Rarity::Common,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for parsing Category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category '{}', expected one of 牛乳, 加工乳, 乳飲料",
            self.0
        )
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Rarity tier, persisted as 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common = 1,
    Evolved = 2,
    Epic = 3,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Evolved, Rarity::Epic];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Three-slot star rendering, e.g. `★★☆`
    pub fn stars(value: u8) -> String {
        (1..=3u8)
            .map(|slot| if slot <= value { '★' } else { '☆' })
            .collect()
    }
}

/// Elemental attribute, keyed by a single-kanji symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "氷")]
    Ice,
    #[serde(rename = "光")]
    Light,
    #[serde(rename = "炎")]
    Fire,
    #[serde(rename = "草")]
    Nature,
    #[serde(rename = "水")]
    Water,
    /// 無 - no manufacturer affinity
    #[serde(rename = "無")]
    Neutral,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Ice,
        Attribute::Light,
        Attribute::Fire,
        Attribute::Nature,
        Attribute::Water,
        Attribute::Neutral,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Attribute::Ice => "氷",
            Attribute::Light => "光",
            Attribute::Fire => "炎",
            Attribute::Nature => "草",
            Attribute::Water => "水",
            Attribute::Neutral => "無",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.symbol() == symbol)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Validated generation input
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub product_name: String,
    pub category: Category,
    /// Non-fat milk solids, percent
    pub non_fat_solid: f64,
    /// Milk fat, percent
    pub milk_fat: f64,
    pub manufacturer: String,
}

/// Deterministic stats derived from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterStats {
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub rarity: Rarity,
    pub attribute: Attribute,
}

/// Display fields of a monster, as returned to the caller and listed in the collection.
///
/// `rarity` and `attribute` are kept in their persisted form because rows read
/// back from the ledger are not guaranteed to hold in-range values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub hp: u32,
    pub attack: u32,
    pub rarity: u8,
    pub attribute: String,
}

/// Ledger-only provenance of a monster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub product_name: String,
    pub manufacturer: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// A full ledger row: display fields plus provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterRecord {
    #[serde(flatten)]
    pub monster: Monster,
    pub provenance: Provenance,
}

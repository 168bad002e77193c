//! Stat derivation
//!
//! Pure mapping from a validated request to monster stats. Composition
//! percentages scale by ten into HP and attack, the category fixes rarity, and
//! the manufacturer picks an elemental attribute from an ordered rule table.

use super::types::{Attribute, GenerationRequest, MonsterStats};

/// Suffix appended to the product name to form the monster name
pub const NAME_SUFFIX: &str = "のスライム";

/// A manufacturer substring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerRule {
    pub needle: &'static str,
    pub attribute: Attribute,
}

impl ManufacturerRule {
    pub fn matches(&self, manufacturer: &str) -> bool {
        manufacturer.contains(self.needle)
    }
}

/// Manufacturer affinity rules, evaluated top to bottom.
///
/// The first rule whose needle occurs in the manufacturer name wins. Order is
/// the tie-break when a name contains several needles: position and length of
/// the match inside the name are irrelevant.
pub const MANUFACTURER_RULES: [ManufacturerRule; 6] = [
    ManufacturerRule {
        needle: "雪印",
        attribute: Attribute::Ice,
    },
    ManufacturerRule {
        needle: "メグミルク",
        attribute: Attribute::Ice,
    },
    ManufacturerRule {
        needle: "森永",
        attribute: Attribute::Light,
    },
    ManufacturerRule {
        needle: "明治",
        attribute: Attribute::Fire,
    },
    ManufacturerRule {
        needle: "よつ葉",
        attribute: Attribute::Nature,
    },
    ManufacturerRule {
        needle: "タカナシ",
        attribute: Attribute::Water,
    },
];

pub fn attribute_for_manufacturer(manufacturer: &str) -> Attribute {
    MANUFACTURER_RULES
        .iter()
        .find(|rule| rule.matches(manufacturer))
        .map(|rule| rule.attribute)
        .unwrap_or(Attribute::Neutral)
}

/// Scale a composition percentage into a stat: `round(value * 10)`, half away from zero.
/// Negative input clamps to zero; values past `u32::MAX` saturate.
pub fn scale_stat(value: f64) -> u32 {
    (value * 10.0).round().max(0.0) as u32
}

pub fn monster_name(product_name: &str) -> String {
    format!("{}{}", product_name, NAME_SUFFIX)
}

pub fn derive_stats(request: &GenerationRequest) -> MonsterStats {
    MonsterStats {
        name: monster_name(&request.product_name),
        hp: scale_stat(request.non_fat_solid),
        attack: scale_stat(request.milk_fat),
        rarity: request.category.rarity(),
        attribute: attribute_for_manufacturer(&request.manufacturer),
    }
}

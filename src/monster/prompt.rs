//! Image prompt synthesis
//!
//! Builds the image-backend prompt from rarity and attribute alone. The text is
//! a fixed template, so a (rarity, attribute) pair always yields the same bytes.

use super::types::{Attribute, Rarity};

pub fn rarity_phrase(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "a simple, cute, blob-like",
        Rarity::Evolved => "a cool, slightly evolved",
        Rarity::Epic => "an epic, impressive looking",
    }
}

pub fn theme_phrase(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Ice => "ice/crystal",
        Attribute::Light => "light/shining",
        Attribute::Fire => "fire/warm",
        Attribute::Nature => "nature/plant",
        Attribute::Water => "water/bubble",
        Attribute::Neutral => "plain milk-white",
    }
}

pub fn synthesize_prompt(rarity: Rarity, attribute: Attribute) -> String {
    format!(
        "A full-body character of a milk-inspired monster. \
         The monster is {}. \
         The monster's theme is {}. \
         Style: cute, Japanese anime style, simple vector art, clean lines, on a pure white background.",
        rarity_phrase(rarity),
        theme_phrase(attribute)
    )
}

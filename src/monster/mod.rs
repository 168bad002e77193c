//! Monster domain
//!
//! This module provides:
//! - Domain types (categories, rarity, attributes, ledger records)
//! - Form validation from raw text input
//! - Deterministic stat derivation
//! - Image prompt synthesis

pub mod form;
pub mod prompt;
pub mod stats;
pub mod types;

pub use form::{GenerationForm, ValidationErrors};
pub use prompt::synthesize_prompt;
pub use stats::{attribute_for_manufacturer, derive_stats, MANUFACTURER_RULES};
pub use types::*;

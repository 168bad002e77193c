//! Outcome shapes returned across the presentation boundary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, MonsterError};
use crate::monster::Monster;

const GENERATED: &str = "モンスターが生まれました！";
const LISTING_FAILED: &str = "モンスター図鑑の読み込みに失敗しました。";

/// Result of one generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// Short user-facing message
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster: Option<Monster>,
    /// Diagnostic text of the underlying failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl GenerationOutcome {
    pub fn success(monster: Monster) -> Self {
        Self {
            message: GENERATED.to_string(),
            monster: Some(monster),
            error: None,
            failure: None,
            field_errors: None,
        }
    }

    pub fn failure(error: &MonsterError) -> Self {
        let field_errors = match error {
            MonsterError::Validation(errors) => Some(errors.fields().clone()),
            _ => None,
        };
        Self {
            message: error.user_message().to_string(),
            monster: None,
            error: Some(error.to_string()),
            failure: Some(error.kind()),
            field_errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.monster.is_some()
    }
}

/// Result of a collection listing. Listing never fails outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOutcome {
    /// Newest first
    pub monsters: Vec<Monster>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CollectionOutcome {
    pub fn listed(monsters: Vec<Monster>) -> Self {
        Self {
            monsters,
            error: None,
        }
    }

    /// Empty collection carrying the listing-failure message plus diagnostics
    pub fn unavailable(diagnostic: impl std::fmt::Display) -> Self {
        Self {
            monsters: Vec::new(),
            error: Some(format!("{} ({})", LISTING_FAILED, diagnostic)),
        }
    }
}

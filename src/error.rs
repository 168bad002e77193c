//! Error types for the monster generation pipeline
//!
//! Each component owns a `thiserror` enum; `MonsterError` aggregates them so the
//! orchestrator can classify any failure into a `FailureKind` for the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::auth::AuthError;
pub use crate::config::ConfigError;
pub use crate::image::ImageError;
pub use crate::ledger::LedgerError;
pub use crate::monster::ValidationErrors;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum MonsterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Image generation error: {0}")]
    ImageGeneration(#[from] ImageError),

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse failure classification surfaced across the presentation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    ImageGeneration,
    Authorization,
    Persistence,
    Configuration,
}

impl MonsterError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MonsterError::Validation(_) => FailureKind::Validation,
            MonsterError::ImageGeneration(_) => FailureKind::ImageGeneration,
            MonsterError::Authorization(_) => FailureKind::Authorization,
            MonsterError::Persistence(_) => FailureKind::Persistence,
            MonsterError::Config(_) => FailureKind::Configuration,
        }
    }

    /// Short user-facing message for this failure
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Validation => "入力内容に誤りがあります。",
            FailureKind::ImageGeneration => {
                "画像の生成に失敗しました。APIキーまたはOpenAIのステータスを確認してください。"
            }
            FailureKind::Authorization => "認証に失敗したため、モンスターを保存できませんでした。",
            FailureKind::Persistence => "モンスターの保存に失敗しました。",
            FailureKind::Configuration => "設定に誤りがあります。",
        }
    }

    /// True when the monster image exists but the record never reached the ledger
    pub fn is_unsaved_generation(&self) -> bool {
        matches!(self, FailureKind::Authorization | FailureKind::Persistence)
    }
}

pub type Result<T> = std::result::Result<T, MonsterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err: MonsterError = ImageError::NoImageUrl.into();
        assert_eq!(err.kind(), FailureKind::ImageGeneration);
        assert!(!err.kind().is_unsaved_generation());

        let err: MonsterError = AuthError::MissingAccessToken.into();
        assert_eq!(err.kind(), FailureKind::Authorization);
        assert!(err.kind().is_unsaved_generation());

        let err: MonsterError = LedgerError::Api {
            status: 403,
            body: "forbidden".into(),
        }
        .into();
        assert_eq!(err.kind(), FailureKind::Persistence);
        assert!(err.kind().is_unsaved_generation());
    }

    #[test]
    fn test_persistence_and_generation_messages_differ() {
        assert_ne!(
            FailureKind::ImageGeneration.user_message(),
            FailureKind::Persistence.user_message()
        );
        assert_ne!(
            FailureKind::ImageGeneration.user_message(),
            FailureKind::Authorization.user_message()
        );
    }
}

//! Monster generation pipeline
//!
//! Sequences validation, stat derivation, prompt synthesis, image generation,
//! authorization and persistence for one request, and reads the collection back.
//! Each request runs its stages strictly in order; nothing is shared between
//! requests except the client handles.

mod outcome;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{ServiceAccountTokenIssuer, TokenIssuer};
use crate::config::MonsterConfig;
use crate::error::{MonsterError, Result};
use crate::image::{ImageGenerator, OpenAiImageClient};
use crate::ledger::{Ledger, SheetsLedger};
use crate::monster::{
    derive_stats, synthesize_prompt, GenerationForm, GenerationRequest, Monster, MonsterRecord,
    Provenance,
};

pub use outcome::{CollectionOutcome, GenerationOutcome};

/// Stages of one generation request, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Deriving,
    Synthesizing,
    GeneratingImage,
    Authorizing,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Deriving => "deriving",
            Stage::Synthesizing => "synthesizing",
            Stage::GeneratingImage => "generating_image",
            Stage::Authorizing => "authorizing",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = %stage, "Pipeline stage");
}

/// Orchestrates the image backend, token issuer and ledger
#[derive(Clone)]
pub struct MonsterPipeline {
    images: Arc<dyn ImageGenerator>,
    tokens: Arc<dyn TokenIssuer>,
    ledger: Arc<dyn Ledger>,
}

impl MonsterPipeline {
    pub fn new(
        images: Arc<dyn ImageGenerator>,
        tokens: Arc<dyn TokenIssuer>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            images,
            tokens,
            ledger,
        }
    }

    /// Wire the OpenAI, service-account and Sheets clients from configuration
    pub fn from_config(config: &MonsterConfig) -> Result<Self> {
        let client = config.http_client()?;

        let images =
            OpenAiImageClient::with_model(config.openai_api_key.clone(), &config.image_model)
                .with_http_client(client.clone());
        let tokens = ServiceAccountTokenIssuer::new(config.credentials.clone())
            .with_http_client(client.clone());
        let ledger = SheetsLedger::new(config.spreadsheet_id.clone())
            .with_sheet_name(config.sheet_name.clone())
            .with_http_client(client);

        Ok(Self::new(Arc::new(images), Arc::new(tokens), Arc::new(ledger)))
    }

    /// Run a raw form through the whole pipeline and shape the result for the caller
    pub async fn generate(&self, form: &GenerationForm) -> GenerationOutcome {
        enter(Stage::Validating);
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                tracing::info!(fields = %errors.summary(), "Rejected generation form");
                return GenerationOutcome::failure(&errors.into());
            }
        };

        match self.generate_request(request).await {
            Ok(monster) => GenerationOutcome::success(monster),
            Err(e) => GenerationOutcome::failure(&e),
        }
    }

    /// Generate and persist a monster for an already validated request.
    ///
    /// An image failure means nothing was created. An authorization or
    /// persistence failure means the image exists but the monster was not saved;
    /// the image is discarded.
    pub async fn generate_request(&self, request: GenerationRequest) -> Result<Monster> {
        enter(Stage::Deriving);
        let stats = derive_stats(&request);

        enter(Stage::Synthesizing);
        let prompt = synthesize_prompt(stats.rarity, stats.attribute);

        enter(Stage::GeneratingImage);
        let image = self.images.generate_image(&prompt).await.map_err(|e| {
            tracing::error!(
                model = %self.images.model_name(),
                product = %request.product_name,
                error = %e,
                "Image generation failed"
            );
            MonsterError::from(e)
        })?;

        let record = MonsterRecord {
            monster: Monster {
                id: Uuid::new_v4().to_string(),
                name: stats.name,
                image_url: image.url,
                hp: stats.hp,
                attack: stats.attack,
                rarity: stats.rarity.value(),
                attribute: stats.attribute.symbol().to_string(),
            },
            provenance: Provenance {
                product_name: request.product_name,
                manufacturer: request.manufacturer,
                created_at: Utc::now().to_rfc3339(),
            },
        };

        enter(Stage::Authorizing);
        let token = self.tokens.access_token().await.map_err(|e| {
            tracing::error!(
                monster_id = %record.monster.id,
                error = %e,
                "Authorization failed, monster not saved"
            );
            MonsterError::from(e)
        })?;

        enter(Stage::Persisting);
        self.ledger.append(&token, &record).await.map_err(|e| {
            tracing::error!(
                monster_id = %record.monster.id,
                error = %e,
                "Ledger append failed, monster not saved"
            );
            MonsterError::from(e)
        })?;

        enter(Stage::Done);
        tracing::info!(
            monster_id = %record.monster.id,
            name = %record.monster.name,
            rarity = record.monster.rarity,
            attribute = %record.monster.attribute,
            "Monster generated"
        );
        Ok(record.monster)
    }

    /// Full collection, newest first. Any failure yields an empty collection with an error.
    pub async fn list(&self) -> CollectionOutcome {
        match self.read_collection().await {
            Ok(monsters) => {
                tracing::info!(count = monsters.len(), "Listed monsters");
                CollectionOutcome::listed(monsters)
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), error = %e, "Listing failed");
                CollectionOutcome::unavailable(&e)
            }
        }
    }

    async fn read_collection(&self) -> Result<Vec<Monster>> {
        let token = self.tokens.access_token().await?;
        let records = self.ledger.read_all(&token).await?;
        Ok(records.into_iter().map(|r| r.monster).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessToken, AuthError};
    use crate::error::FailureKind;
    use crate::image::{GeneratedImage, ImageError};
    use crate::ledger::LedgerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubImages;

    #[async_trait]
    impl ImageGenerator for StubImages {
        async fn generate_image(
            &self,
            prompt: &str,
        ) -> std::result::Result<GeneratedImage, ImageError> {
            assert!(prompt.contains("milk-inspired monster"));
            Ok(GeneratedImage {
                url: "https://img.example/slime.png".into(),
                revised_prompt: None,
            })
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    struct DeniedTokens;

    #[async_trait]
    impl TokenIssuer for DeniedTokens {
        async fn access_token(&self) -> std::result::Result<AccessToken, AuthError> {
            Err(AuthError::Denied {
                error: "invalid_grant".into(),
                description: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingLedger {
        rows: Mutex<Vec<MonsterRecord>>,
    }

    #[async_trait]
    impl Ledger for RecordingLedger {
        async fn append(
            &self,
            _token: &AccessToken,
            record: &MonsterRecord,
        ) -> std::result::Result<(), LedgerError> {
            self.rows.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn read_all(
            &self,
            _token: &AccessToken,
        ) -> std::result::Result<Vec<MonsterRecord>, LedgerError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn reference_request() -> GenerationRequest {
        GenerationForm::from_entries([
            ("productName", "おいしい牛乳"),
            ("category", "牛乳"),
            ("nonFatSolid", "8.3"),
            ("milkFat", "3.8"),
            ("manufacturer", "明治"),
        ])
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_authorization_failure_skips_ledger() {
        let ledger = Arc::new(RecordingLedger::default());
        let pipeline =
            MonsterPipeline::new(Arc::new(StubImages), Arc::new(DeniedTokens), ledger.clone());

        let err = pipeline.generate_request(reference_request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Authorization);
        assert!(ledger.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_auth_failure_is_downgraded() {
        let pipeline = MonsterPipeline::new(
            Arc::new(StubImages),
            Arc::new(DeniedTokens),
            Arc::new(RecordingLedger::default()),
        );
        let outcome = pipeline.list().await;
        assert!(outcome.monsters.is_empty());
        assert!(outcome.error.unwrap().contains("invalid_grant"));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::GeneratingImage.to_string(), "generating_image");
        assert_eq!(Stage::Done.to_string(), "done");
    }
}

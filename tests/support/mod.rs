//! Test doubles for the pipeline's external services

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use milk_monster::auth::{AccessToken, AuthError, TokenIssuer};
use milk_monster::image::{GeneratedImage, ImageError, ImageGenerator};
use milk_monster::ledger::{Ledger, LedgerError};
use milk_monster::{GenerationForm, MonsterPipeline, MonsterRecord};

pub const FAKE_IMAGE_URL: &str = "https://images.test/monster.png";

/// Image backend that succeeds or fails on every call and records prompts
#[derive(Default)]
pub struct FakeImageGenerator {
    fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeImageGenerator {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ImageError::Api {
                status: 429,
                body: "rate limited".into(),
            });
        }
        Ok(GeneratedImage {
            url: FAKE_IMAGE_URL.into(),
            revised_prompt: Some(format!("revised: {}", prompt)),
        })
    }

    fn model_name(&self) -> &str {
        "fake-image"
    }
}

/// Token issuer that always grants or always denies
#[derive(Default)]
pub struct FakeTokenIssuer {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTokenIssuer {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenIssuer for FakeTokenIssuer {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AuthError::Rejected {
                status: 400,
                body: r#"{"error":"invalid_grant"}"#.into(),
            });
        }
        Ok(AccessToken {
            token: "test-token".into(),
            token_type: "Bearer".into(),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

/// Ledger holding rows in memory, in append order
#[derive(Default)]
pub struct InMemoryLedger {
    rows: Mutex<Vec<MonsterRecord>>,
    fail_append: bool,
    fail_read: bool,
    appends: AtomicUsize,
    reads: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<MonsterRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn failing_append() -> Self {
        Self {
            fail_append: true,
            ..Self::default()
        }
    }

    pub fn failing_read() -> Self {
        Self {
            fail_read: true,
            ..Self::default()
        }
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<MonsterRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn append(
        &self,
        _token: &AccessToken,
        record: &MonsterRecord,
    ) -> Result<(), LedgerError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_append {
            return Err(LedgerError::Api {
                status: 503,
                body: "backend unavailable".into(),
            });
        }
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn read_all(&self, _token: &AccessToken) -> Result<Vec<MonsterRecord>, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            return Err(LedgerError::Api {
                status: 500,
                body: "internal".into(),
            });
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }
}

/// Pipeline wired to the given doubles, handles kept for assertions
pub struct Harness {
    pub images: Arc<FakeImageGenerator>,
    pub tokens: Arc<FakeTokenIssuer>,
    pub ledger: Arc<InMemoryLedger>,
    pub pipeline: MonsterPipeline,
}

impl Harness {
    pub fn new(
        images: FakeImageGenerator,
        tokens: FakeTokenIssuer,
        ledger: InMemoryLedger,
    ) -> Self {
        let images = Arc::new(images);
        let tokens = Arc::new(tokens);
        let ledger = Arc::new(ledger);
        let pipeline = MonsterPipeline::new(images.clone(), tokens.clone(), ledger.clone());
        Self {
            images,
            tokens,
            ledger,
            pipeline,
        }
    }

    pub fn healthy() -> Self {
        Self::new(
            FakeImageGenerator::ok(),
            FakeTokenIssuer::ok(),
            InMemoryLedger::new(),
        )
    }
}

pub fn form(
    product_name: &str,
    category: &str,
    non_fat_solid: &str,
    milk_fat: &str,
    manufacturer: &str,
) -> GenerationForm {
    GenerationForm::from_entries([
        ("productName", product_name),
        ("category", category),
        ("nonFatSolid", non_fat_solid),
        ("milkFat", milk_fat),
        ("manufacturer", manufacturer),
    ])
}

pub fn reference_form() -> GenerationForm {
    form("おいしい牛乳", "牛乳", "8.3", "3.8", "明治")
}

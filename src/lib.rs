//! Milk Monster
//!
//! Turns the nutritional label of a dairy product into a game-style monster:
//! deterministic stats derived from the label, an AI-generated portrait, and a
//! row in a shared spreadsheet ledger that can be listed back as a collection.
//!
//! ## Modules
//!
//! - `monster` - domain types, form validation, stat derivation, prompt synthesis
//! - `image` - image backend trait and OpenAI Images client
//! - `auth` - service-account JWT assertion and token exchange
//! - `ledger` - row codec and Google Sheets ledger
//! - `pipeline` - request orchestration and caller-facing outcomes
//! - `config` - environment-driven configuration

pub mod auth;
pub mod config;
pub mod error;
pub mod image;
pub mod ledger;
pub mod monster;
pub mod pipeline;

pub use config::MonsterConfig;
pub use error::{FailureKind, MonsterError, Result};
pub use monster::{
    Attribute, Category, GenerationForm, GenerationRequest, Monster, MonsterRecord, Rarity,
};
pub use pipeline::{CollectionOutcome, GenerationOutcome, MonsterPipeline, Stage};

//! Monster ledger
//!
//! The ledger is an append-only spreadsheet tab holding one row per monster.
//! This module provides:
//! - The `Ledger` trait the pipeline persists through
//! - Row encoding and tolerant row decoding
//! - The Google Sheets implementation

pub mod row;
pub mod sheets;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AccessToken;
use crate::monster::MonsterRecord;

pub use row::{record_from_row, record_to_row, records_from_rows, COLUMN_COUNT, HEADER};
pub use sheets::SheetsLedger;

/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse sheets response: {0}")]
    MalformedResponse(String),

    #[error("invalid ledger URL: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for LedgerError {
    fn from(error: url::ParseError) -> Self {
        LedgerError::InvalidUrl(error.to_string())
    }
}

/// Persistent store of generated monsters
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append one record as a new row. The store assigns the row position.
    async fn append(&self, token: &AccessToken, record: &MonsterRecord) -> Result<(), LedgerError>;

    /// All records, newest first
    async fn read_all(&self, token: &AccessToken) -> Result<Vec<MonsterRecord>, LedgerError>;
}

//! Google Sheets ledger
//!
//! Appends monster rows to a spreadsheet tab and reads the tab back through the
//! Sheets v4 `values` API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::row::{record_to_row, records_from_rows};
use super::{Ledger, LedgerError};
use crate::auth::AccessToken;
use crate::monster::MonsterRecord;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Default tab name
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Column span covering all ten row cells
const COLUMN_SPAN: &str = "A:J";

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: [&'a [Value]; 1],
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Absent when the range holds no data
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Sheets-backed ledger for one spreadsheet tab
#[derive(Debug, Clone)]
pub struct SheetsLedger {
    client: reqwest::Client,
    spreadsheet_id: String,
    sheet_name: String,
    base_url: String,
}

impl SheetsLedger {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// A1 range covering the ledger columns, e.g. `Sheet1!A:J`
    pub fn range(&self) -> String {
        format!("{}!{}", self.sheet_name, COLUMN_SPAN)
    }

    fn values_url(&self, range_segment: &str) -> Result<Url, LedgerError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| LedgerError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range_segment);
        Ok(url)
    }

    pub fn append_url(&self) -> Result<Url, LedgerError> {
        let mut url = self.values_url(&format!("{}:append", self.range()))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        Ok(url)
    }

    pub fn read_url(&self) -> Result<Url, LedgerError> {
        self.values_url(&self.range())
    }
}

async fn api_error(response: reqwest::Response) -> LedgerError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    LedgerError::Api { status, body }
}

#[async_trait]
impl Ledger for SheetsLedger {
    async fn append(&self, token: &AccessToken, record: &MonsterRecord) -> Result<(), LedgerError> {
        let row = record_to_row(record);
        let response = self
            .client
            .post(self.append_url()?)
            .bearer_auth(&token.token)
            .json(&AppendBody { values: [&row] })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        tracing::debug!(
            monster_id = %record.monster.id,
            range = %self.range(),
            "Appended ledger row"
        );
        Ok(())
    }

    async fn read_all(&self, token: &AccessToken) -> Result<Vec<MonsterRecord>, LedgerError> {
        let response = self
            .client
            .get(self.read_url()?)
            .bearer_auth(&token.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        let range: ValueRange = serde_json::from_str(&body)
            .map_err(|e| LedgerError::MalformedResponse(e.to_string()))?;

        tracing::debug!(rows = range.values.len(), "Read ledger rows");
        Ok(records_from_rows(range.values))
    }
}

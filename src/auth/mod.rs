//! Service-account authorization
//!
//! Mints short-lived bearer tokens for the spreadsheet API by signing a JWT
//! assertion with a service-account key and exchanging it at the OAuth2 token
//! endpoint. A fresh token is minted for every ledger operation.

pub mod credential;
pub mod service_account;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use credential::{CredentialSource, ServiceCredential};
pub use service_account::{build_assertion, mint_access_token, ServiceAccountTokenIssuer};

/// Authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("service credential not configured: {0}")]
    CredentialMissing(String),

    #[error("failed to read service credential {path}: {source}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid service credential: {0}")]
    CredentialParse(#[from] serde_json::Error),

    #[error("failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint rejected assertion {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token endpoint returned error '{error}'")]
    Denied {
        error: String,
        description: Option<String>,
    },

    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    #[error("token response contained no access_token")]
    MissingAccessToken,
}

/// A bearer access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

// Token text stays out of logs
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer tokens for the ledger
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Mint a token for one ledger operation. Failures are fatal for that operation.
    async fn access_token(&self) -> Result<AccessToken, AuthError>;
}

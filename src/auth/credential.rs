//! Service-account credential loading

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::AuthError;

/// Google OAuth2 token endpoint, also the assertion audience
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Default credential file, relative to the working directory
pub const DEFAULT_CREDENTIALS_PATH: &str = "google-credentials.json";

/// Service-account key file contents. Extra fields in the file are ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceCredential {
    /// Issuer identity
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceCredential {
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Token endpoint and assertion audience
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Where the credential comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// JSON blob provided through the environment
    Inline(String),
    /// Key file on disk
    File(PathBuf),
}

impl CredentialSource {
    /// Prefer a non-blank inline blob, then the given path, then the default file
    pub fn resolve(inline: Option<String>, path: Option<PathBuf>) -> Self {
        match inline {
            Some(blob) if !blob.trim().is_empty() => CredentialSource::Inline(blob),
            _ => CredentialSource::File(
                path.unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            ),
        }
    }

    /// Read and parse the credential. Called once per token mint.
    pub async fn load(&self) -> Result<ServiceCredential, AuthError> {
        match self {
            CredentialSource::Inline(blob) => ServiceCredential::from_json(blob),
            CredentialSource::File(path) => {
                let json = read_key_file(path).await?;
                ServiceCredential::from_json(&json)
            }
        }
    }
}

async fn read_key_file(path: &Path) -> Result<String, AuthError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => {
                AuthError::CredentialMissing(format!("{} does not exist", path.display()))
            }
            _ => AuthError::CredentialRead {
                path: path.to_path_buf(),
                source,
            },
        })
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

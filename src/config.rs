//! Runtime configuration
//!
//! Reads config from env vars:
//!   OPENAI_API_KEY          - image backend key (required)
//!   OPENAI_IMAGE_MODEL      - image model (default: dall-e-3)
//!   SPREADSHEET_ID          - ledger spreadsheet (required)
//!   SHEET_NAME              - ledger tab (default: Sheet1)
//!   GOOGLE_CREDENTIALS_JSON - service-account key as a JSON blob
//!   GOOGLE_CREDENTIALS_PATH - service-account key file (default: google-credentials.json)
//!   HTTP_TIMEOUT_SECS       - per-request HTTP timeout (default: 60)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::auth::CredentialSource;
use crate::image::openai::DEFAULT_IMAGE_MODEL;
use crate::ledger::sheets::DEFAULT_SHEET_NAME;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Pipeline configuration
#[derive(Clone)]
pub struct MonsterConfig {
    pub openai_api_key: String,
    pub image_model: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub credentials: CredentialSource,
    pub http_timeout: Duration,
}

impl MonsterConfig {
    /// Create from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key =
            get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let spreadsheet_id =
            get("SPREADSHEET_ID").ok_or(ConfigError::Missing("SPREADSHEET_ID"))?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            openai_api_key,
            image_model: get("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            spreadsheet_id,
            sheet_name: get("SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            credentials: CredentialSource::resolve(
                get("GOOGLE_CREDENTIALS_JSON"),
                get("GOOGLE_CREDENTIALS_PATH").map(PathBuf::from),
            ),
            http_timeout,
        })
    }

    /// Shared HTTP client honoring the configured timeout
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()?)
    }
}

impl fmt::Debug for MonsterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonsterConfig")
            .field("openai_api_key", &"<redacted>")
            .field("image_model", &self.image_model)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("credentials", &self.credentials)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MonsterConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SPREADSHEET_ID", "sheet-123"),
        ]))
        .unwrap();
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.sheet_name, "Sheet1");
        assert_eq!(config.http_timeout, Duration::from_secs(60));
        assert_eq!(
            config.credentials,
            CredentialSource::File(PathBuf::from("google-credentials.json"))
        );
    }

    #[test]
    fn test_inline_credentials_win() {
        let config = MonsterConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_CREDENTIALS_JSON", "{\"client_email\":\"a@b\"}"),
            ("GOOGLE_CREDENTIALS_PATH", "/secrets/key.json"),
            ("SHEET_NAME", "Monsters"),
        ]))
        .unwrap();
        assert!(matches!(config.credentials, CredentialSource::Inline(_)));
        assert_eq!(config.sheet_name, "Monsters");
    }

    #[test]
    fn test_missing_required() {
        let err =
            MonsterConfig::from_lookup(lookup(&[("SPREADSHEET_ID", "sheet-123")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));

        let err = MonsterConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "  "),
            ("SPREADSHEET_ID", "sheet-123"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = MonsterConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-very-secret"),
            ("SPREADSHEET_ID", "sheet-123"),
        ]))
        .unwrap();
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = MonsterConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SPREADSHEET_ID", "sheet-123"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_TIMEOUT_SECS", .. }));
    }
}

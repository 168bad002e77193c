//! JWT-bearer token exchange
//!
//! Signs an RS256 assertion for the service account and trades it for an access
//! token at the credential's token endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::{AccessToken, AuthError, CredentialSource, ServiceCredential, TokenIssuer};

/// Read/write scope for the spreadsheet API
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime; the token endpoint caps grants at one hour
const ASSERTION_TTL_SECS: i64 = 3600;

/// Claims of the signed assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(credential: &ServiceCredential, scope: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: credential.client_email.clone(),
            scope: scope.to_string(),
            aud: credential.token_uri().to_string(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Sign the assertion for `credential` with its private key
pub fn build_assertion(
    credential: &ServiceCredential,
    scope: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = AssertionClaims::new(credential, scope, now);

    let mut header = Header::new(Algorithm::RS256);
    header.kid = credential.private_key_id.clone();

    let key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &key)?)
}

/// Turn a successful token endpoint body into an `AccessToken`
pub fn parse_token_response(body: &str, now: DateTime<Utc>) -> Result<AccessToken, AuthError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(AuthError::Denied {
            error,
            description: response.error_description,
        });
    }

    let token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingAccessToken)?;

    let expires_in = response.expires_in.unwrap_or(ASSERTION_TTL_SECS);
    let expires_at = Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AuthError::MalformedResponse(format!("expires_in out of range: {}", expires_in))
        })?;

    Ok(AccessToken {
        token,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at,
    })
}

/// Mint one access token for `credential`. A single attempt: any failure is returned as-is.
pub async fn mint_access_token(
    client: &reqwest::Client,
    credential: &ServiceCredential,
    scope: &str,
) -> Result<AccessToken, AuthError> {
    let now = Utc::now();
    let assertion = build_assertion(credential, scope, now)?;

    let response = client
        .post(credential.token_uri())
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let token = parse_token_response(&body, now)?;
    tracing::debug!(
        issuer = %credential.client_email,
        expires_at = %token.expires_at,
        "Minted access token"
    );
    Ok(token)
}

/// Token issuer backed by a service-account key.
///
/// The credential is loaded on every call and no token is cached, so each
/// ledger operation pays for one credential read and one token exchange.
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenIssuer {
    source: CredentialSource,
    scope: String,
    client: reqwest::Client,
}

impl ServiceAccountTokenIssuer {
    pub fn new(source: CredentialSource) -> Self {
        Self {
            source,
            scope: SPREADSHEETS_SCOPE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TokenIssuer for ServiceAccountTokenIssuer {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let credential = self.source.load().await?;
        mint_access_token(&self.client, &credential, &self.scope).await
    }
}

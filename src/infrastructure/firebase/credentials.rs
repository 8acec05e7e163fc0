use std::{
    fmt,
    path::Path,
    time::{Duration, Instant},
};

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::StoreError;

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str = "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/devstorage.read_write";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The parts of a service-account key file the REST clients need.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub token_uri: String,
    private_key_id: Option<String>,
    private_key: Zeroizing<String>,
}

#[derive(Deserialize)]
struct KeyFile {
    project_id: String,
    client_email: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
    #[serde(default)]
    private_key_id: Option<String>,
    private_key: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let file: KeyFile = serde_json::from_str(raw)
            .map_err(|e| StoreError::Credentials(format!("invalid service account key: {e}")))?;

        Ok(ServiceAccountKey {
            project_id: file.project_id,
            client_email: file.client_email,
            token_uri: file.token_uri,
            private_key_id: file.private_key_id,
            private_key: Zeroizing::new(file.private_key),
        })
    }

    pub async fn from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = Zeroizing::new(tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?);
        Self::from_json(&raw)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Exchanges signed service-account assertions for OAuth access tokens and
/// caches the current one.
pub struct ServiceAccountTokenSource {
    http: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self, StoreError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| StoreError::Credentials(format!("invalid private key: {e}")))?;

        Ok(ServiceAccountTokenSource {
            http,
            key,
            signing_key,
            cached: RwLock::new(None),
        })
    }

    pub async fn access_token(&self) -> Result<String, StoreError> {
        if let Some(token) = self.cached.read().as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *self.cached.write() = Some(fresh);
        Ok(value)
    }

    fn assertion(&self) -> Result<String, StoreError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.signing_key)
            .map_err(|e| StoreError::Credentials(format!("cannot sign assertion: {e}")))
    }

    async fn fetch(&self) -> Result<CachedToken, StoreError> {
        let assertion = self.assertion()?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Credentials(format!("token exchange failed ({status}): {body}")));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "Obtained service account access token");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::{
    entities::identity::VerifiedIdentity,
    errors::AuthError,
    repositories::identity::IdentityVerifier,
};

const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const JWKS_TTL: Duration = Duration::from_secs(3600);
/// A kid miss only triggers a refetch when the cached set is at least this old.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies Firebase Authentication ID tokens against Google's published
/// signing keys.
pub struct FirebaseTokenVerifier {
    http: reqwest::Client,
    project_id: String,
    jwks_url: String,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    pub fn new(http: reqwest::Client, project_id: &str) -> Self {
        FirebaseTokenVerifier {
            http,
            project_id: project_id.to_string(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            cache: RwLock::new(None),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation
    }

    fn cached_key(&self, kid: &str, max_age: Duration) -> Option<Jwk> {
        self.cache
            .read()
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < max_age)
            .and_then(|cached| cached.keys.find(kid).cloned())
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.cached_key(kid, JWKS_TTL) {
            return Ok(key);
        }

        let recently_fetched = self
            .cache
            .read()
            .as_ref()
            .is_some_and(|cached| cached.fetched_at.elapsed() < MIN_REFRESH_INTERVAL);
        if recently_fetched {
            return Err(AuthError::InvalidToken);
        }

        let keys = self.fetch_keys().await?;
        let key = keys.find(kid).cloned();
        *self.cache.write() = Some(CachedKeys { keys, fetched_at: Instant::now() });

        key.ok_or(AuthError::InvalidToken)
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let unavailable = |e: reqwest::Error| AuthError::VerifierUnavailable(e.to_string());

        let keys: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        tracing::debug!(count = keys.keys.len(), "Fetched identity signing keys");
        Ok(keys)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(id_token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken);
        }
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)?;
        let claims = decode::<FirebaseClaims>(id_token, &key, &self.validation())?.claims;

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(VerifiedIdentity {
            uid: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn verifier() -> FirebaseTokenVerifier {
        FirebaseTokenVerifier::new(reqwest::Client::new(), "demo-project")
    }

    #[actix_rt::test]
    async fn malformed_tokens_are_invalid() {
        assert_eq!(verifier().verify("not-a-jwt").await, Err(AuthError::InvalidToken));
    }

    #[actix_rt::test]
    async fn symmetric_tokens_are_rejected_before_any_key_lookup() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"sub": "u1", "email": "admin@example.com"}),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(verifier().verify(&token).await, Err(AuthError::InvalidToken));
    }

    #[test]
    fn validation_pins_audience_and_issuer() {
        let validation = verifier().validation();
        assert!(validation.aud.as_ref().is_some_and(|aud| aud.contains("demo-project")));
        assert!(validation
            .iss
            .as_ref()
            .is_some_and(|iss| iss.contains("https://securetoken.google.com/demo-project")));
        assert_eq!(validation.algorithms, vec![Algorithm::RS256]);
    }
}

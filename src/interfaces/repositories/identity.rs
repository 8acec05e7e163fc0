use async_trait::async_trait;

use crate::{entities::identity::VerifiedIdentity, errors::AuthError};

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Decodes and checks an ID token issued by the identity provider.
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError>;
}

use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    entities::identity::{AdminIdentity, VerifiedIdentity},
    errors::AuthError,
    repositories::identity::IdentityVerifier,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Single-admin authorization: a token is accepted only when it verifies and
/// its email is the configured admin email.
pub struct AuthHandler {
    pub verifier: Arc<dyn IdentityVerifier>,
    admin_email: String,
}

impl AuthHandler {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, admin_email: &str) -> Self {
        AuthHandler {
            verifier,
            admin_email: admin_email.trim().to_string(),
        }
    }

    /// Pulls the token out of an `Authorization: Bearer <token>` header value.
    pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
        header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Admin gate decision for a request's `Authorization` header.
    pub async fn authorize(&self, header: Option<&str>) -> Result<AdminIdentity, AuthError> {
        let token = Self::extract_bearer(header).ok_or(AuthError::MissingToken)?;
        self.admit(token).await
    }

    /// Checks a token posted by the sign-in page.
    pub async fn verify_id_token(&self, id_token: Option<&str>) -> Result<AdminIdentity, AuthError> {
        let token = id_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingIdToken)?;
        self.admit(token).await
    }

    async fn admit(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        let identity = self.verifier.verify(token).await.map_err(|e| {
            match &e {
                AuthError::VerifierUnavailable(cause) => error!(error = %cause, "Token verification failed"),
                other => warn!(error = %other, "Token verification failed"),
            }
            AuthError::InvalidToken
        })?;

        self.require_admin(identity)
    }

    fn require_admin(&self, identity: VerifiedIdentity) -> Result<AdminIdentity, AuthError> {
        match identity.email {
            Some(email) if email == self.admin_email => Ok(AdminIdentity {
                uid: identity.uid,
                email,
            }),
            email => {
                warn!(uid = %identity.uid, email = ?email, "Non-admin identity rejected");
                Err(AuthError::NotAdmin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::eq};

    mock! {
        pub Verifier {}

        #[async_trait]
        impl IdentityVerifier for Verifier {
            async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError>;
        }
    }

    const ADMIN: &str = "admin@example.com";

    fn handler_with(verifier: MockVerifier) -> AuthHandler {
        AuthHandler::new(Arc::new(verifier), ADMIN)
    }

    fn identity(email: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            uid: "uid-1".into(),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(AuthHandler::extract_bearer(Some("Bearer abc")), Some("abc"));
        assert_eq!(AuthHandler::extract_bearer(Some("bearer abc")), None);
        assert_eq!(AuthHandler::extract_bearer(Some("Basic abc")), None);
        assert_eq!(AuthHandler::extract_bearer(Some("Bearer ")), None);
        assert_eq!(AuthHandler::extract_bearer(None), None);
    }

    #[actix_rt::test]
    async fn admin_token_is_accepted() {
        let mut verifier = MockVerifier::new();
        verifier
            .expect_verify()
            .with(eq("good"))
            .times(1)
            .returning(|_| Ok(identity(Some(ADMIN))));

        let admin = handler_with(verifier).authorize(Some("Bearer good")).await.unwrap();
        assert_eq!(admin, AdminIdentity { uid: "uid-1".into(), email: ADMIN.into() });
    }

    #[actix_rt::test]
    async fn other_identities_are_forbidden() {
        for email in [Some("someone@example.com"), Some("ADMIN@example.com"), None] {
            let mut verifier = MockVerifier::new();
            verifier.expect_verify().returning(move |_| Ok(identity(email)));

            let err = handler_with(verifier).authorize(Some("Bearer token")).await.unwrap_err();
            assert_eq!(err, AuthError::NotAdmin);
        }
    }

    #[actix_rt::test]
    async fn missing_header_skips_verification() {
        let mut verifier = MockVerifier::new();
        verifier.expect_verify().never();

        let handler = handler_with(verifier);
        assert_eq!(handler.authorize(None).await.unwrap_err(), AuthError::MissingToken);
        assert_eq!(handler.authorize(Some("Token x")).await.unwrap_err(), AuthError::MissingToken);
    }

    #[actix_rt::test]
    async fn verifier_failures_are_unauthorized() {
        let mut verifier = MockVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(AuthError::VerifierUnavailable("jwks down".into())));

        let err = handler_with(verifier).authorize(Some("Bearer t")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[actix_rt::test]
    async fn verify_id_token_requires_a_token() {
        let mut verifier = MockVerifier::new();
        verifier.expect_verify().never();

        let handler = handler_with(verifier);
        assert_eq!(handler.verify_id_token(None).await.unwrap_err(), AuthError::MissingIdToken);
        assert_eq!(handler.verify_id_token(Some("  ")).await.unwrap_err(), AuthError::MissingIdToken);
    }
}

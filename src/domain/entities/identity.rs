use serde::Serialize;

/// What the identity provider vouches for after checking a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
}

/// The configured administrator, derived per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminIdentity {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub user: AdminIdentity,
}

#[derive(Debug, Serialize)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub user: AdminIdentity,
}

#[derive(Debug, serde::Deserialize)]
pub struct VerifyTokenRequest {
    #[serde(rename = "idToken", default)]
    pub id_token: Option<String>,
}

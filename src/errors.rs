use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    /// Carries the public message only; the cause is logged where the error is built.
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Validation failed: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "{}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Logs `cause` server-side and returns a 500 that only exposes `public`.
    pub fn internal(public: &str, cause: impl fmt::Display) -> Self {
        tracing::error!(error = %cause, "{}", public);
        AppError::InternalError(public.to_string())
    }

    /// Maps a store failure: missing documents become 404 with `missing`,
    /// everything else a logged 500 with `public`.
    pub fn from_store(err: StoreError, public: &str, missing: &str) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(missing.to_string()),
            other => AppError::internal(public, other),
        }
    }

    pub fn field(field: &str, message: &str) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(field_errors)
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum AuthError {
    #[display("Unauthorized - No token provided")]
    MissingToken,

    #[display("Unauthorized - Invalid token")]
    InvalidToken,

    #[display("Forbidden - Admin access required")]
    NotAdmin,

    #[display("ID token is required")]
    MissingIdToken,

    #[display("Identity verification unavailable: {_0}")]
    VerifierUnavailable(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AuthError::VerifierUnavailable(cause) => {
                tracing::error!(error = %cause, "Identity verifier unavailable");
                "Failed to verify token".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({"error": message}))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotAdmin => StatusCode::FORBIDDEN,
            AuthError::MissingIdToken => StatusCode::BAD_REQUEST,
            AuthError::VerifierUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %e, "ID token rejected");
        AuthError::InvalidToken
    }
}

/// Failures reported by the document store, blob store and credential clients.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("Transport error: {_0}")]
    Transport(String),

    #[display("Permission denied: {_0}")]
    Permission(String),

    #[display("Decode error: {_0}")]
    Decode(String),

    #[display("Credentials error: {_0}")]
    Credentials(String),
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

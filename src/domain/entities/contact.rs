use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::iso_millis;

#[derive(Debug, Deserialize, Validate)]
pub struct NewContactMessage {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    pub email: Option<String>,

    pub subject: Option<String>,

    #[validate(
        required(message = "Message is required"),
        length(min = 1, message = "Message is required")
    )]
    pub message: Option<String>,
}

/// Immutable after creation apart from the `read` flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContactCreatedResponse {
    pub id: String,
    pub message: String,
}

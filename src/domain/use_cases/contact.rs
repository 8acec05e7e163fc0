use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use crate::{
    constants::{CONTACTS_COLLECTION, CREATED_AT_FIELD, DEFAULT_CONTACT_SUBJECT},
    entities::{
        contact::{ContactCreatedResponse, ContactMessage, NewContactMessage},
        stored_now,
    },
    errors::AppError,
    repositories::document_store::{to_fields, DocumentStore, Fields, OrderBy},
    utils::form_fields::non_empty,
};

const NOT_FOUND: &str = "Message not found";

pub struct ContactHandler {
    documents: Arc<dyn DocumentStore>,
}

impl ContactHandler {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        ContactHandler { documents }
    }

    /// Stores an inbound message from the public contact form.
    #[instrument(skip(self, request))]
    pub async fn create_contact_message(
        &self,
        request: NewContactMessage,
    ) -> Result<ContactCreatedResponse, AppError> {
        const FAILED: &str = "Failed to submit message";

        request.validate()?;

        let message = ContactMessage {
            id: String::new(),
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            subject: non_empty(request.subject).unwrap_or_else(|| DEFAULT_CONTACT_SUBJECT.to_string()),
            message: request.message.unwrap_or_default(),
            read: false,
            created_at: stored_now(),
        };

        let fields = to_fields(&message).map_err(|e| AppError::internal(FAILED, e))?;
        let id = self.documents
            .add(CONTACTS_COLLECTION, fields)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;

        tracing::info!(%id, "Contact message received");
        Ok(ContactCreatedResponse {
            id,
            message: "Message sent successfully".to_string(),
        })
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        const FAILED: &str = "Failed to fetch messages";

        self.documents
            .list(CONTACTS_COLLECTION, Some(OrderBy::desc(CREATED_AT_FIELD)))
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
            .into_iter()
            .map(|doc| doc.into_entity().map_err(|e| AppError::internal(FAILED, e)))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_contact_message(&self, id: &str) -> Result<ContactMessage, AppError> {
        const FAILED: &str = "Failed to fetch message";

        self.documents
            .get(CONTACTS_COLLECTION, id)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?
            .into_entity()
            .map_err(|e| AppError::internal(FAILED, e))
    }

    #[instrument(skip(self))]
    pub async fn mark_as_read(&self, id: &str) -> Result<(), AppError> {
        const FAILED: &str = "Failed to update message";

        self.ensure_exists(id, FAILED).await?;

        let mut fields = Fields::new();
        fields.insert("read".to_string(), Value::Bool(true));
        self.documents
            .update(CONTACTS_COLLECTION, id, fields)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))
    }

    #[instrument(skip(self))]
    pub async fn delete_contact_message(&self, id: &str) -> Result<(), AppError> {
        const FAILED: &str = "Failed to delete message";

        self.ensure_exists(id, FAILED).await?;

        self.documents
            .delete(CONTACTS_COLLECTION, id)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))
    }

    async fn ensure_exists(&self, id: &str, failed: &str) -> Result<(), AppError> {
        match self.documents.get(CONTACTS_COLLECTION, id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(AppError::NotFound(NOT_FOUND.to_string())),
            Err(e) => Err(AppError::internal(failed, e)),
        }
    }
}

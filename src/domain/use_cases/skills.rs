use std::sync::Arc;

use tracing::instrument;

use crate::{
    constants::{CERTIFICATE_FOLDER, SKILLS_COLLECTION, SKILL_ICON_FOLDER, SORT_ORDER_FIELD},
    entities::{
        skill::{clamp_proficiency, Skill, SkillInput, SkillMedia},
        stored_now,
        upload::UploadedFile,
    },
    errors::AppError,
    repositories::{
        blob_store::BlobStore,
        document_store::{to_fields, DocumentStore, OrderBy},
    },
    use_cases::media::{discard_blob, replace_blob},
    utils::form_fields::{non_empty, parse_int_lenient},
};

const NOT_FOUND: &str = "Skill not found";

pub struct SkillHandler {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl SkillHandler {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        SkillHandler { documents, blobs }
    }

    #[instrument(skip(self))]
    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        const FAILED: &str = "Failed to fetch skills";

        self.documents
            .list(SKILLS_COLLECTION, Some(OrderBy::asc(SORT_ORDER_FIELD)))
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
            .into_iter()
            .map(|doc| doc.into_entity().map_err(|e| AppError::internal(FAILED, e)))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_skill(&self, id: &str) -> Result<Skill, AppError> {
        const FAILED: &str = "Failed to fetch skill";

        self.documents
            .get(SKILLS_COLLECTION, id)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?
            .into_entity()
            .map_err(|e| AppError::internal(FAILED, e))
    }

    #[instrument(skip(self, input, media))]
    pub async fn create_skill(
        &self,
        input: SkillInput,
        media: SkillMedia<UploadedFile>,
    ) -> Result<Skill, AppError> {
        const FAILED: &str = "Failed to create skill";

        let name = non_empty(input.name)
            .ok_or_else(|| AppError::field("name", "Name is required"))?;

        let icon_url = replace_blob(self.blobs.as_ref(), None, media.icon.as_ref(), SKILL_ICON_FOLDER)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;
        let certificate_url =
            match replace_blob(self.blobs.as_ref(), None, media.certificate.as_ref(), CERTIFICATE_FOLDER).await {
                Ok(url) => url,
                Err(e) => {
                    discard_blob(self.blobs.as_ref(), icon_url.as_deref()).await;
                    return Err(AppError::internal(FAILED, e));
                }
            };

        let now = stored_now();
        let mut skill = Skill {
            id: String::new(),
            name,
            category: input.category.unwrap_or_default(),
            proficiency: clamp_proficiency(
                input.proficiency.as_deref().and_then(parse_int_lenient).unwrap_or(0),
            ),
            icon_url,
            certificate_url,
            order: input.order.as_deref().and_then(parse_int_lenient).unwrap_or(0),
            created_at: now,
            updated_at: now,
        };

        let fields = to_fields(&skill).map_err(|e| AppError::internal(FAILED, e))?;
        skill.id = self.documents
            .add(SKILLS_COLLECTION, fields)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;

        tracing::info!(id = %skill.id, "Skill created");
        Ok(skill)
    }

    /// Read-modify-write without a version check: two concurrent partial
    /// updates can drop one another's changes.
    #[instrument(skip(self, input, media))]
    pub async fn update_skill(
        &self,
        id: &str,
        input: SkillInput,
        media: SkillMedia<UploadedFile>,
    ) -> Result<Skill, AppError> {
        const FAILED: &str = "Failed to update skill";

        let current = self.get_skill(id).await?;

        let icon_url = replace_blob(self.blobs.as_ref(), current.icon_url, media.icon.as_ref(), SKILL_ICON_FOLDER)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;
        let certificate_url = replace_blob(
            self.blobs.as_ref(),
            current.certificate_url,
            media.certificate.as_ref(),
            CERTIFICATE_FOLDER,
        )
        .await
        .map_err(|e| AppError::internal(FAILED, e))?;

        let skill = Skill {
            id: current.id,
            name: non_empty(input.name).unwrap_or(current.name),
            category: non_empty(input.category).unwrap_or(current.category),
            proficiency: input
                .proficiency
                .as_deref()
                .and_then(parse_int_lenient)
                .map(clamp_proficiency)
                .unwrap_or(current.proficiency),
            icon_url,
            certificate_url,
            order: input.order.as_deref().and_then(parse_int_lenient).unwrap_or(current.order),
            created_at: current.created_at,
            updated_at: stored_now(),
        };

        let mut fields = to_fields(&skill).map_err(|e| AppError::internal(FAILED, e))?;
        fields.remove("createdAt");
        self.documents
            .update(SKILLS_COLLECTION, id, fields)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))?;

        Ok(skill)
    }

    #[instrument(skip(self))]
    pub async fn delete_skill(&self, id: &str) -> Result<(), AppError> {
        const FAILED: &str = "Failed to delete skill";

        let current = self.get_skill(id).await?;
        discard_blob(self.blobs.as_ref(), current.icon_url.as_deref()).await;
        discard_blob(self.blobs.as_ref(), current.certificate_url.as_deref()).await;

        self.documents
            .delete(SKILLS_COLLECTION, id)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))
    }
}

use std::sync::Arc;

use tracing::instrument;

use crate::{
    constants::{PROJECTS_COLLECTION, PROJECT_IMAGE_FOLDER, SORT_ORDER_FIELD},
    entities::{project::{Project, ProjectInput}, stored_now, upload::UploadedFile},
    errors::AppError,
    repositories::{
        blob_store::BlobStore,
        document_store::{to_fields, DocumentStore, OrderBy},
    },
    use_cases::media::{discard_blob, replace_blob},
    utils::form_fields::{non_empty, parse_flag, parse_int_lenient, parse_string_list},
};

const NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ProjectHandler {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        ProjectHandler { documents, blobs }
    }

    /// All projects, ascending by sort order.
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        const FAILED: &str = "Failed to fetch projects";

        let documents = self.documents
            .list(PROJECTS_COLLECTION, Some(OrderBy::asc(SORT_ORDER_FIELD)))
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;

        documents
            .into_iter()
            .map(|doc| doc.into_entity().map_err(|e| AppError::internal(FAILED, e)))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        const FAILED: &str = "Failed to fetch project";

        self.documents
            .get(PROJECTS_COLLECTION, id)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?
            .into_entity()
            .map_err(|e| AppError::internal(FAILED, e))
    }

    /// Creates a project, uploading the image first when one is attached.
    #[instrument(skip(self, input, image))]
    pub async fn create_project(
        &self,
        input: ProjectInput,
        image: Option<UploadedFile>,
    ) -> Result<Project, AppError> {
        const FAILED: &str = "Failed to create project";

        let title = non_empty(input.title)
            .ok_or_else(|| AppError::field("title", "Title is required"))?;
        let technologies = match input.technologies {
            Some(raw) => parse_string_list("technologies", &raw)?,
            None => Vec::new(),
        };

        let image_url = match image {
            Some(file) => Some(
                self.blobs
                    .upload(&file, PROJECT_IMAGE_FOLDER)
                    .await
                    .map_err(|e| AppError::internal(FAILED, e))?,
            ),
            None => None,
        };

        let now = stored_now();
        let mut project = Project {
            id: String::new(),
            title,
            description: input.description.unwrap_or_default(),
            technologies,
            image_url,
            live_url: non_empty(input.live_url),
            github_url: non_empty(input.github_url),
            featured: input.featured.as_deref().is_some_and(parse_flag),
            order: input.order.as_deref().and_then(parse_int_lenient).unwrap_or(0),
            created_at: now,
            updated_at: now,
        };

        let fields = to_fields(&project).map_err(|e| AppError::internal(FAILED, e))?;
        project.id = self.documents
            .add(PROJECTS_COLLECTION, fields)
            .await
            .map_err(|e| AppError::internal(FAILED, e))?;

        tracing::info!(id = %project.id, "Project created");
        Ok(project)
    }

    /// Applies the submitted fields over the stored project. Absent or empty
    /// title/description keep their stored values; submitted links replace
    /// theirs even when empty. Last write wins between concurrent updates.
    #[instrument(skip(self, input, image))]
    pub async fn update_project(
        &self,
        id: &str,
        input: ProjectInput,
        image: Option<UploadedFile>,
    ) -> Result<Project, AppError> {
        const FAILED: &str = "Failed to update project";

        let current = self.get_project(id).await?;

        let technologies = match non_empty(input.technologies) {
            Some(raw) => parse_string_list("technologies", &raw)?,
            None => current.technologies,
        };

        let image_url = replace_blob(
            self.blobs.as_ref(),
            current.image_url,
            image.as_ref(),
            PROJECT_IMAGE_FOLDER,
        )
        .await
        .map_err(|e| AppError::internal(FAILED, e))?;

        let project = Project {
            id: current.id,
            title: non_empty(input.title).unwrap_or(current.title),
            description: non_empty(input.description).unwrap_or(current.description),
            technologies,
            image_url,
            live_url: match input.live_url {
                Some(url) => non_empty(Some(url)),
                None => current.live_url,
            },
            github_url: match input.github_url {
                Some(url) => non_empty(Some(url)),
                None => current.github_url,
            },
            featured: input.featured.as_deref().map_or(current.featured, parse_flag),
            order: input.order.as_deref().and_then(parse_int_lenient).unwrap_or(current.order),
            created_at: current.created_at,
            updated_at: stored_now(),
        };

        let mut fields = to_fields(&project).map_err(|e| AppError::internal(FAILED, e))?;
        fields.remove("createdAt");
        self.documents
            .update(PROJECTS_COLLECTION, id, fields)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))?;

        Ok(project)
    }

    /// Deletes the project and, best-effort, its image.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        const FAILED: &str = "Failed to delete project";

        let current = self.get_project(id).await?;
        discard_blob(self.blobs.as_ref(), current.image_url.as_deref()).await;

        self.documents
            .delete(PROJECTS_COLLECTION, id)
            .await
            .map_err(|e| AppError::from_store(e, FAILED, NOT_FOUND))
    }
}

use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    entities::{
        project::{ProjectForm, ProjectInput},
        upload::UploadedFile,
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, FormOrJson},
    AppState,
};

pub type ProjectPayload = FormOrJson<MultipartForm<ProjectForm>, web::Json<ProjectInput>>;

async fn into_parts(payload: ProjectPayload) -> Result<(ProjectInput, Option<UploadedFile>), AppError> {
    match payload {
        FormOrJson::Form(form) => {
            let (input, image) = form.into_inner().into_parts();
            Ok((input, UploadedFile::from_optional(image).await?))
        }
        FormOrJson::Json(json) => Ok((json.into_inner(), None)),
    }
}

pub async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project(&path).await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: ProjectPayload,
) -> Result<HttpResponse, AppError> {
    let (input, image) = into_parts(payload).await?;
    let project = state.project_handler.create_project(input, image).await?;
    Ok(HttpResponse::Created().json(project))
}

pub async fn update_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: ProjectPayload,
) -> Result<HttpResponse, AppError> {
    let (input, image) = into_parts(payload).await?;
    let project = state.project_handler.update_project(&path, input, image).await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn delete_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.project_handler.delete_project(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" })))
}

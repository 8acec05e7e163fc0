use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    entities::{
        skill::{SkillForm, SkillInput, SkillMedia},
        upload::UploadedFile,
    },
    errors::AppError,
    use_cases::extractors::{AdminClaims, FormOrJson},
    AppState,
};

pub type SkillPayload = FormOrJson<MultipartForm<SkillForm>, web::Json<SkillInput>>;

async fn into_parts(payload: SkillPayload) -> Result<(SkillInput, SkillMedia<UploadedFile>), AppError> {
    match payload {
        FormOrJson::Form(form) => {
            let (input, media) = form.into_inner().into_parts();
            let media = SkillMedia {
                icon: UploadedFile::from_optional(media.icon).await?,
                certificate: UploadedFile::from_optional(media.certificate).await?,
            };
            Ok((input, media))
        }
        FormOrJson::Json(json) => Ok((json.into_inner(), SkillMedia::default())),
    }
}

pub async fn list_skills(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.skill_handler.list_skills().await?))
}

pub async fn get_skill(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.skill_handler.get_skill(&path).await?))
}

pub async fn create_skill(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    payload: SkillPayload,
) -> Result<HttpResponse, AppError> {
    let (input, media) = into_parts(payload).await?;
    let skill = state.skill_handler.create_skill(input, media).await?;
    Ok(HttpResponse::Created().json(skill))
}

pub async fn update_skill(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: SkillPayload,
) -> Result<HttpResponse, AppError> {
    let (input, media) = into_parts(payload).await?;
    let skill = state.skill_handler.update_skill(&path, input, media).await?;
    Ok(HttpResponse::Ok().json(skill))
}

pub async fn delete_skill(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.skill_handler.delete_skill(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Skill deleted successfully" })))
}

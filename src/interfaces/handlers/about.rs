use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};

use crate::{
    entities::{
        about::{AboutForm, AboutMedia},
        upload::UploadedFile,
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

pub async fn get_about(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.about_handler.get_about().await?))
}

pub async fn update_about(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: MultipartForm<AboutForm>,
) -> Result<HttpResponse, AppError> {
    let (input, media) = form.into_inner().into_parts();
    let media = AboutMedia {
        profile_image: UploadedFile::from_optional(media.profile_image).await?,
        resume: UploadedFile::from_optional(media.resume).await?,
    };

    let about = state.about_handler.update_about(input, media).await?;
    Ok(HttpResponse::Ok().json(about))
}

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    entities::contact::NewContactMessage,
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

/// Public: the site's contact form posts here.
pub async fn create_contact_message(
    state: web::Data<AppState>,
    body: web::Json<NewContactMessage>,
) -> Result<HttpResponse, AppError> {
    let created = state.contact_handler.create_contact_message(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_contact_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.contact_handler.list_contact_messages().await?))
}

pub async fn get_contact_message(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.contact_handler.get_contact_message(&path).await?))
}

pub async fn mark_as_read(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.mark_as_read(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Message marked as read" })))
}

pub async fn delete_contact_message(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.delete_contact_message(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Message deleted successfully" })))
}

use actix_web::{web, HttpResponse};

use crate::{
    entities::identity::{AuthCheckResponse, VerifyTokenRequest, VerifyTokenResponse},
    errors::AuthError,
    use_cases::extractors::AdminClaims,
    AppState,
};

/// Sign-in check for the admin UI: 400 without a token, 401 when it does not
/// verify, 403 for anyone but the admin.
pub async fn verify_token(
    state: web::Data<AppState>,
    body: Option<web::Json<VerifyTokenRequest>>,
) -> Result<HttpResponse, AuthError> {
    let id_token = body.and_then(|body| body.into_inner().id_token);
    let user = state.auth_handler.verify_id_token(id_token.as_deref()).await?;

    Ok(HttpResponse::Ok().json(VerifyTokenResponse { success: true, user }))
}

pub async fn check_auth(AdminClaims(user): AdminClaims) -> HttpResponse {
    HttpResponse::Ok().json(AuthCheckResponse { authenticated: true, user })
}

use actix_web::{dev::Payload, http::header::CONTENT_TYPE, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::{entities::identity::AdminIdentity, errors::AuthError};

/// Extractor for the admin identity the admin gate attached to the request.
/// Returns 401 when the gate did not run for this route.
#[derive(Debug)]
pub struct AdminClaims(pub AdminIdentity);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AdminIdentity>() {
            Some(identity) => ready(Ok(AdminClaims(identity.clone()))),
            None => ready(Err(AuthError::MissingToken.into())),
        }
    }
}

/// Picks the body extractor from the request's content type: `Form` for
/// `multipart/form-data`, `Json` for everything else. The body is streamed
/// into whichever one applies.
#[derive(Debug)]
pub enum FormOrJson<F, J> {
    Form(F),
    Json(J),
}

impl<F, J> FromRequest for FormOrJson<F, J>
where
    F: FromRequest + 'static,
    J: FromRequest + 'static,
    F::Future: 'static,
    J::Future: 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req) {
            let form = F::from_request(req, payload);
            Box::pin(async move { form.await.map(FormOrJson::Form).map_err(Into::into) })
        } else {
            let json = J::from_request(req, payload);
            Box::pin(async move { json.await.map(FormOrJson::Json).map_err(Into::into) })
        }
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::AppError, AppState};

/// Lets public routes through and requires the configured admin everywhere
/// else under `/api`. On success the `AdminIdentity` is stored in the request
/// extensions for the `AdminClaims` extractor.
pub struct AdminGate;

impl<S> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminGateService {
            service: Rc::new(service),
        })
    }
}

pub struct AdminGateService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AdminGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method().as_str()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in admin gate");
                let error = AppError::InternalError("Something went wrong!".into());
                return Ok(req.into_response(error.error_response()));
            };

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match state.auth_handler.authorize(header.as_deref()).await {
                Ok(admin) => {
                    req.extensions_mut().insert(admin);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), error = %e, "Admin gate rejected request");
                    Ok(req.into_response(e.error_response()))
                }
            }
        })
    }
}

/// Everything outside `/api` is public, as are the read-only portfolio routes
/// and the two anonymous POSTs.
pub fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    let rest = match path.strip_prefix("/api") {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return true,
    };
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

    matches!(
        (method, segments.as_slice()),
        ("GET", [])
            | ("GET", ["health"])
            | ("GET", ["projects"])
            | ("GET", ["projects", _])
            | ("GET", ["skills"])
            | ("GET", ["skills", _])
            | ("GET", ["about"])
            | ("POST", ["contact"])
            | ("POST", ["auth", "verify-token"])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_reads_are_public() {
        for path in ["/api", "/api/health", "/api/projects", "/api/projects/abc", "/api/skills/x", "/api/about"] {
            assert!(is_public_route(path, "GET"), "{path}");
        }
    }

    #[test]
    fn anonymous_posts_are_public() {
        assert!(is_public_route("/api/contact", "POST"));
        assert!(is_public_route("/api/auth/verify-token", "POST"));
    }

    #[test]
    fn writes_and_inbox_reads_need_admin() {
        assert!(!is_public_route("/api/projects", "POST"));
        assert!(!is_public_route("/api/projects/abc", "PUT"));
        assert!(!is_public_route("/api/skills/abc", "DELETE"));
        assert!(!is_public_route("/api/about", "PUT"));
        assert!(!is_public_route("/api/contact", "GET"));
        assert!(!is_public_route("/api/contact/abc/read", "PATCH"));
        assert!(!is_public_route("/api/auth/check", "GET"));
        assert!(!is_public_route("/api/projects/abc/extra", "GET"));
    }

    #[test]
    fn non_api_paths_and_preflights_pass() {
        assert!(is_public_route("/", "GET"));
        assert!(is_public_route("/index.html", "GET"));
        assert!(is_public_route("/apidocs", "POST"));
        assert!(is_public_route("/api/projects", "OPTIONS"));
    }
}

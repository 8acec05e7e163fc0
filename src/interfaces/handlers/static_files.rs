use actix_files::NamedFile;
use actix_web::{http::Method, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::AppState;

const INDEX_FILE: &str = "index.html";

/// Fallback for anything no route matched. API paths get a JSON 404; other
/// GETs get the client app's `index.html` so its router can take over.
pub async fn fallback(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let path = req.path();
    let is_api = path == "/api" || path.starts_with("/api/");

    if is_api || (*req.method() != Method::GET && *req.method() != Method::HEAD) {
        return HttpResponse::NotFound().json(json!({ "error": "Not found" }));
    }

    match NamedFile::open_async(state.public_dir.join(INDEX_FILE)).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            tracing::debug!(error = %e, "No index document to serve");
            HttpResponse::NotFound().json(json!({ "error": "Not found" }))
        }
    }
}

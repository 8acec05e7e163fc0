use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{
    constants::{ABOUT_COLLECTION, ABOUT_DOCUMENT_ID, START_TIME},
    AppState,
};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    document_store: &'static str,
    version: &'static str,
}

/// Liveness plus a single-document read to confirm the store is reachable.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now();
    let uptime = now.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let document_store = match state.documents.get(ABOUT_COLLECTION, ABOUT_DOCUMENT_ID).await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "Document store health probe failed");
            "Unavailable"
        }
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: if document_store == "OK" { "healthy" } else { "degraded" },
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        timestamp: now.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        document_store,
        version: env!("CARGO_PKG_VERSION"),
    })
}

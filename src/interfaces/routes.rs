use std::path::Path;

use actix_files::Files;
use actix_web::web;

use crate::handlers::{home::home, static_files::fallback, system::health_check};

mod about;
mod auth;
mod contact;
pub mod json_error;
mod projects;
mod skills;

/// Registers the API under `/api`, then the static site under `/`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize, public_dir: &Path) {
    json_error::config_routes(cfg, max_upload_bytes);

    cfg.service(
        web::scope("/api")
            .route("", web::get().to(home))
            .route("/health", web::get().to(health_check))
            .configure(projects::config_routes)
            .configure(skills::config_routes)
            .configure(about::config_routes)
            .configure(contact::config_routes)
            .configure(auth::config_routes)
    );

    if public_dir.is_dir() {
        cfg.service(
            Files::new("/", public_dir)
                .index_file("index.html")
                .default_handler(web::to(fallback))
        );
    } else {
        tracing::warn!(dir = %public_dir.display(), "Public directory missing, static files disabled");
    }

    cfg.default_service(web::to(fallback));
}

use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/verify-token", web::post().to(auth::verify_token))
            .route("/check", web::get().to(auth::check_auth))
    );
}

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use portfolio_site::{
    clients::SharedClients,
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AdminGate,
    routes::{configure_routes, json_error::catch_all},
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    AppState,
};

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = if origins.iter().any(|origin| origin == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_tracing(&AppEnvironment::from_env().unwrap_or(AppEnvironment::Development));

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let clients = match SharedClients::from_config(&config).await {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!("Failed to initialise service clients: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::from_clients(&config, clients));
    let server_addr = format!("{}:{}", config.host, config.port);
    let max_upload_bytes = config.max_upload_bytes();
    let public_dir = config.public_dir.clone();
    let workers = config.worker_count;

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AdminGate)
            .wrap(catch_all())
            .wrap(build_cors(&config))
            .wrap(TracingLogger::default())
            .wrap(NormalizePath::trim())
            .configure(|cfg| configure_routes(cfg, max_upload_bytes, &public_dir))
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}

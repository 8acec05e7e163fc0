#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use portfolio_site::{
    entities::identity::VerifiedIdentity,
    errors::AuthError,
    memory::{blob_store::MemoryBlobStore, document_store::MemoryDocumentStore},
    middlewares::auth::AdminGate,
    repositories::identity::IdentityVerifier,
    routes::{configure_routes, json_error::catch_all},
    AppState,
};
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde_json::Value;
use std::{net::TcpListener, path::PathBuf, sync::Arc, time::Duration};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";
pub const INDEX_HTML: &str = "<!doctype html><title>portfolio</title>";
const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Accepts two fixed tokens: one for the admin and one for an ordinary user.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        match id_token {
            ADMIN_TOKEN => Ok(VerifiedIdentity {
                uid: "admin-uid".into(),
                email: Some(ADMIN_EMAIL.into()),
            }),
            USER_TOKEN => Ok(VerifiedIdentity {
                uid: "user-uid".into(),
                email: Some("someone@example.com".into()),
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub blobs: Arc<MemoryBlobStore>,
    pub public_dir: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let public_dir = std::env::temp_dir().join(format!("portfolio-site-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&public_dir).expect("Failed to create public dir");
        std::fs::write(public_dir.join("index.html"), INDEX_HTML).expect("Failed to write index.html");

        let blobs = Arc::new(MemoryBlobStore::new("test-bucket"));
        let state = web::Data::new(AppState::new(
            ADMIN_EMAIL,
            Arc::new(MemoryDocumentStore::new()),
            blobs.clone(),
            Arc::new(StubVerifier),
            public_dir.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let dir = public_dir.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(AdminGate)
                .wrap(catch_all())
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_routes(cfg, MAX_UPLOAD_BYTES, &dir))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        actix_rt::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, client, blobs, public_dir }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn as_admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(ADMIN_TOKEN)
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.client.get(self.url(path)).bearer_auth(ADMIN_TOKEN).send().await.unwrap();
        assert!(response.status().is_success(), "GET {path} failed: {}", response.status());
        response.json().await.unwrap()
    }

    pub async fn create_project(&self, form: Form) -> Value {
        let response = self
            .as_admin(self.client.post(self.url("/api/projects")))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.public_dir);
    }
}

pub fn text_form(fields: &[(&str, &str)]) -> Form {
    fields
        .iter()
        .fold(Form::new(), |form, (name, value)| form.text(name.to_string(), value.to_string()))
}

pub fn png_part(file_name: &str) -> Part {
    let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    Part::bytes(png)
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .unwrap()
}

use std::{sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    firebase::{
        credentials::{ServiceAccountKey, ServiceAccountTokenSource},
        firestore::FirestoreClient,
        identity::FirebaseTokenVerifier,
        storage::GcsBlobStore,
    },
    memory::{blob_store::MemoryBlobStore, document_store::MemoryDocumentStore},
    repositories::{blob_store::BlobStore, document_store::DocumentStore, identity::IdentityVerifier},
    settings::{AppConfig, StoreBackend},
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const LOCAL_BUCKET: &str = "local-bucket";

/// The external service clients, built once at startup and shared by all workers.
#[derive(Clone)]
pub struct SharedClients {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl SharedClients {
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build HTTP client")?;

        match config.backend {
            StoreBackend::Firebase => {
                let key = ServiceAccountKey::from_file(&config.credentials_path)
                    .await
                    .context("failed to load service account credentials")?;
                let project_id = config
                    .firebase_project_id
                    .clone()
                    .unwrap_or_else(|| key.project_id.clone());
                let tokens = Arc::new(
                    ServiceAccountTokenSource::new(http.clone(), key)
                        .context("failed to prepare service account signer")?,
                );

                tracing::info!(%project_id, bucket = %config.storage_bucket, "Using Firebase backend");
                Ok(SharedClients {
                    documents: Arc::new(FirestoreClient::new(http.clone(), tokens.clone(), &project_id)),
                    blobs: Arc::new(GcsBlobStore::new(http.clone(), tokens, &config.storage_bucket)),
                    verifier: Arc::new(FirebaseTokenVerifier::new(http, &project_id)),
                })
            }
            StoreBackend::Memory => {
                let project_id = config
                    .firebase_project_id
                    .as_deref()
                    .context("firebase_project_id is required to verify ID tokens")?;
                let bucket = match config.storage_bucket.trim() {
                    "" => LOCAL_BUCKET,
                    bucket => bucket,
                };

                tracing::warn!("Using in-memory stores; data is lost on restart");
                Ok(SharedClients {
                    documents: Arc::new(MemoryDocumentStore::new()),
                    blobs: Arc::new(MemoryBlobStore::new(bucket)),
                    verifier: Arc::new(FirebaseTokenVerifier::new(http, project_id)),
                })
            }
        }
    }
}

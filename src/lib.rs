use std::{path::PathBuf, sync::Arc};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod clients;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{firebase, memory, utils};

use repositories::{blob_store::BlobStore, document_store::DocumentStore, identity::IdentityVerifier};
use use_cases::{
    about::AboutHandler,
    auth::AuthHandler,
    contact::ContactHandler,
    projects::ProjectHandler,
    skills::SkillHandler,
};

/// Request-independent wiring shared by every worker.
pub struct AppState {
    pub auth_handler: AuthHandler,
    pub project_handler: ProjectHandler,
    pub skill_handler: SkillHandler,
    pub about_handler: AboutHandler,
    pub contact_handler: ContactHandler,
    pub documents: Arc<dyn DocumentStore>,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(
        admin_email: &str,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        verifier: Arc<dyn IdentityVerifier>,
        public_dir: PathBuf,
    ) -> Self {
        AppState {
            auth_handler: AuthHandler::new(verifier, admin_email),
            project_handler: ProjectHandler::new(documents.clone(), blobs.clone()),
            skill_handler: SkillHandler::new(documents.clone(), blobs.clone()),
            about_handler: AboutHandler::new(documents.clone(), blobs.clone()),
            contact_handler: ContactHandler::new(documents.clone()),
            documents,
            public_dir,
        }
    }

    pub fn from_clients(config: &settings::AppConfig, clients: clients::SharedClients) -> Self {
        AppState::new(
            &config.admin_email,
            clients.documents,
            clients.blobs,
            clients.verifier,
            config.public_dir.clone(),
        )
    }
}

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const PROJECTS_COLLECTION: &str = "projects";
pub const SKILLS_COLLECTION: &str = "skills";
pub const ABOUT_COLLECTION: &str = "about";
pub const CONTACTS_COLLECTION: &str = "contacts";

/// The About document lives under this fixed id.
pub const ABOUT_DOCUMENT_ID: &str = "profile";

pub const PROJECT_IMAGE_FOLDER: &str = "projects";
pub const SKILL_ICON_FOLDER: &str = "skills";
pub const CERTIFICATE_FOLDER: &str = "certificates";
pub const PROFILE_IMAGE_FOLDER: &str = "profile";
pub const RESUME_FOLDER: &str = "resume";

pub const DEFAULT_CONTACT_SUBJECT: &str = "No subject";

pub const SORT_ORDER_FIELD: &str = "order";
pub const CREATED_AT_FIELD: &str = "createdAt";

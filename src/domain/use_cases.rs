pub mod about;
pub mod auth;
pub mod contact;
pub mod extractors;
pub mod media;
pub mod projects;
pub mod skills;

pub mod blob_store;
pub mod document_store;
pub mod identity;

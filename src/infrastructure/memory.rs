//! Process-local stand-ins for the document and blob stores.

pub mod blob_store;
pub mod document_store;

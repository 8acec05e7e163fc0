//! REST clients for the hosted Firebase services: Firestore documents,
//! Cloud Storage objects and ID-token verification.

pub mod credentials;
pub mod firestore;
pub mod identity;
pub mod storage;
mod value;

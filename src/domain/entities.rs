pub mod about;
pub mod contact;
pub mod identity;
pub mod project;
pub mod skill;
pub mod upload;

mod lenient;

pub use lenient::stored_now;

pub(crate) use lenient::{empty_as_none, iso_millis, iso_millis_opt, lenient_i64, lenient_string, none_as_empty};

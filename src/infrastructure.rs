pub mod firebase;
pub mod memory;
pub mod utils;

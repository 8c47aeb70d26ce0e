// Shared server-wide types
pub mod errors;

pub use errors::*;

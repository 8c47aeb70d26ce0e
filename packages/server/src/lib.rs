// CompareAnything - API Core
//
// This crate provides the backend API for comparing any two things with an
// LLM: prompt construction, defensive parsing of the model's JSON reply,
// persistence, and recent/trending/permalink reads.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

//! Filter list index library
//!
//! Collects filter list manifests from the forks of a reference repository,
//! removes manifests that repeat an earlier one, resolves a title for every
//! filter list and publishes the result as a JSONP script.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

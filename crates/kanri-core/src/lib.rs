//! # kanri-core
//!
//! Core crate for the Kanri admin backend. Contains traits, configuration
//! schemas, shared entity types, pagination/sorting types, partial-update
//! helpers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Kanri crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod patch;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

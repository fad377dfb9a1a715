//! # Variantsmith Config
//!
//! Configuration management for the variation pipeline: TOML schema,
//! environment expansion, validation and per-stage provider resolution.

mod error;
mod loader;
mod resolve;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolve::Stage;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};

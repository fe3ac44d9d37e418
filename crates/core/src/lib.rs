//! Decora Core Library
//!
//! Domain models, option catalog, prompt building, and configuration for
//! the Decora design studio.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;

pub use catalog::OptionCatalog;
pub use config::{AppConfig, GenerationBackend};
pub use error::{Error, Result};
pub use models::*;

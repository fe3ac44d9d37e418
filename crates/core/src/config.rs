//! Application configuration
//!
//! Three service secrets plus operational knobs. Values come from
//! `config.toml` in the platform config directory, with `DECORA_*`
//! environment variables taking precedence. The core performs no
//! validation of the secret values themselves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Which generation backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    /// Simulated generation with fixed delays and canned replies.
    #[default]
    Stub,
    /// Hosted JSON generation service.
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persistence service endpoint URL.
    pub persistence_url: String,
    /// Persistence service access key.
    pub persistence_key: String,
    /// Generation service API key.
    pub generation_key: String,
    /// Generation service endpoint (http backend only).
    pub generation_url: String,
    /// Backend used for image and reply generation.
    pub generation_backend: GenerationBackend,
    /// Deadline applied to every gateway call, in seconds.
    pub request_timeout_secs: u64,
    /// Optional path to an option-catalog TOML file.
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            persistence_url: String::new(),
            persistence_key: String::new(),
            generation_key: String::new(),
            generation_url: String::new(),
            generation_backend: GenerationBackend::Stub,
            request_timeout_secs: 10,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Load from the default platform location, then apply env overrides.
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            debug!(path = %path.display(), "loading configuration file");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Apply `DECORA_*` environment overrides.
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("DECORA_PERSISTENCE_URL") {
            self.persistence_url = v;
        }
        if let Ok(v) = std::env::var("DECORA_PERSISTENCE_KEY") {
            self.persistence_key = v;
        }
        if let Ok(v) = std::env::var("DECORA_GENERATION_KEY") {
            self.generation_key = v;
        }
        if let Ok(v) = std::env::var("DECORA_GENERATION_URL") {
            self.generation_url = v;
        }
        if let Ok(v) = std::env::var("DECORA_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                self.request_timeout_secs = secs;
            }
        }
    }

    /// Deadline for a single gateway call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Platform directories for Decora (config and cache paths).
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "decora", "decora")
        .ok_or_else(|| Error::Config("could not determine project directories".to_string()))
}

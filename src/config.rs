//! Configuration System
//!
//! Layered configuration: built-in defaults, an optional `folio.toml` file,
//! then `FOLIO_`-prefixed environment overrides. The storage root lives here
//! and is injected into the storage layout explicitly; nothing reads it from
//! ambient process state.

use crate::logging::LoggingConfig;
use crate::store::StorageLayout;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Base directory under which all chapter storage locations live.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("storage")
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Load configuration, layering an explicit file (or `folio.toml` in the
    /// working directory when none is given) and environment overrides on top
    /// of the defaults.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("storage_root", default_storage_root().to_string_lossy().as_ref())?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("folio").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("FOLIO").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// Storage layout rooted at this configuration's storage root.
    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(&self.storage_root)
    }
}

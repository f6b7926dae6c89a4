//! # Configuration
//!
//! Settings are loaded with [`confique`], layered in priority order:
//! 1. **Environment variables**: `MODELCAST_DEFINITIONS`, `MODELCAST_PRETTY`, `MODELCAST_TIME_FORMAT`.
//! 2. **Config file**: a TOML file passed explicitly (`modelcast --config FILE`).
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `definitions` | none | Definition file to load models from |
//! | `pretty` | `true` | Pretty-print JSON output |
//! | `time_format` | `%FT%T%:z` | Format for bare `time` in definition files |

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::definition::DEFAULT_TIME_FORMAT;

/// Configuration for modelcast, stored in `modelcast.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelcastConfig {
    /// Definition file (TOML or JSON) to load models from.
    #[config(env = "MODELCAST_DEFINITIONS")]
    pub definitions: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[config(env = "MODELCAST_PRETTY", default = true)]
    pub pretty: bool,

    /// Format for `time` attributes declared without one.
    #[config(env = "MODELCAST_TIME_FORMAT", default = "%FT%T%:z")]
    pub time_format: String,
}

impl Default for ModelcastConfig {
    fn default() -> Self {
        Self {
            definitions: None,
            pretty: true,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl ModelcastConfig {
    /// Merge environment, an optional file, and compiled defaults.
    pub fn load(file: Option<&Path>) -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder.load()
    }
}

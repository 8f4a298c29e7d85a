//! `ffiweave.toml` configuration
//!
//! ```toml
//! [codegen]
//! preamble = "// Bindings for libfoo"
//! include_docs = false
//! dylib_identifier = "_lib"
//! indent = "    "
//! ```

use anyhow::{Context, Result};
use ffiweave_codegen::DartCodegenConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ffiweave.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub codegen: DartCodegenConfig,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `explicit` if given, else `ffiweave.toml` in the working
    /// directory if present, else the defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            debug!("Using {}", DEFAULT_CONFIG_FILE);
            Self::from_file(implicit)
        } else {
            Ok(Self::default())
        }
    }
}

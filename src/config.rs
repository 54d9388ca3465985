//! # Configuration Module
//!
//! Generator settings, read from an optional `canvasgen.toml` and then from
//! environment variables.
//!
//! ## File
//!
//! ```toml
//! template_dir = "./my-templates"
//! default_port = 8080
//! node_version = "22"
//! readme_timestamp = false
//! strict_names = true
//!
//! [dependencies]
//! bullmq = "^5.12.0"
//!
//! [dev_dependencies]
//! vitest = "^2.1.0"
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! Applied on top of the file:
//!
//! - `CANVASGEN_TEMPLATE_DIR`: override directory for component templates
//! - `CANVASGEN_PORT`: default port of the generated server
//! - `CANVASGEN_STRICT_NAMES`: `true`/`1` to fail on colliding output paths
//!
//! Invalid values are ignored with a warning.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};

/// Conventional config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "canvasgen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Files in this directory override built-in component templates by id
    /// (`element/entity.ts`, `worker/worker.ts`, ...)
    pub template_dir: Option<PathBuf>,
    /// Port baked into `.env.example`, the entrypoint and container files
    pub default_port: u16,
    /// Node.js image tag and engine constraint
    pub node_version: String,
    /// Write a "Generated at" line into the README
    pub readme_timestamp: bool,
    /// Fail when two components generate the same path instead of keeping the
    /// last one
    pub strict_names: bool,
    /// Extra runtime packages merged over the fixed manifest list
    pub dependencies: BTreeMap<String, String>,
    /// Extra development packages merged over the fixed manifest list
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            template_dir: None,
            default_port: 3000,
            node_version: "20".to_string(),
            readme_timestamp: true,
            strict_names: false,
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load `path` (defaults when `None`) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// [`GenError::Config`] when the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML file without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            GenError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        let mut config: GeneratorConfig = toml::from_str(&contents).map_err(|err| {
            GenError::Config(format!("failed to parse {}: {err}", path.display()))
        })?;
        // Relative template dirs are relative to the config file.
        if let (Some(dir), Some(base)) = (&config.template_dir, path.parent()) {
            if dir.is_relative() {
                config.template_dir = Some(base.join(dir));
            }
        }
        tracing::debug!(path = %path.display(), "loaded generator config");
        Ok(config)
    }

    /// `canvasgen.toml` in `dir`, if present.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Apply `CANVASGEN_*` overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("CANVASGEN_TEMPLATE_DIR").filter(|d| !d.trim().is_empty()) {
            self.template_dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = var("CANVASGEN_PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) if port > 0 => self.default_port = port,
                _ => tracing::warn!(value = %port, "ignoring invalid CANVASGEN_PORT"),
            }
        }
        if let Some(strict) = var("CANVASGEN_STRICT_NAMES") {
            match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.strict_names = true,
                "0" | "false" | "no" | "off" => self.strict_names = false,
                _ => tracing::warn!(value = %strict, "ignoring invalid CANVASGEN_STRICT_NAMES"),
            }
        }
    }
}

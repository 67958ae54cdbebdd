// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. TOML file named by SRAU_CONFIG (optional)
//! 3. SRAU_<SECTION>__<KEY> env vars
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SRAU_FACILITY__CLASS=org/example/Env  → facility.class
//! SRAU_RUNTIME__JNI_VERSION=1.8         → runtime.jni_version
//! SRAU_LOGGING__LEVEL=4                 → logging.level
//! SRAU_CONFIG, SRAU_OTHER               → ignored
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::importer::Facility;

use loader::ConfigLoader;
pub use types::{FacilityConfig, LoggingConfig, RuntimeConfig};

/// Environment variable naming the optional config file.
pub const CONFIG_PATH_VAR: &str = "SRAU_CONFIG";

/// Prefix of per-key environment overrides.
pub const ENV_PREFIX: &str = "SRAU";

/// Complete library configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Managed-side facility names.
    pub facility: FacilityConfig,
    /// Host runtime options.
    pub runtime: RuntimeConfig,
    /// Diagnostic logging.
    pub logging: LoggingConfig,
}

impl Config {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration the way the library does at load time.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file contains invalid TOML, an
    /// environment override cannot be parsed, or the merged result fails
    /// validation.
    pub fn load() -> Result<Self> {
        Self::load_from(loader::process_vars())
    }

    /// Like [`Config::load`], with `vars` standing in for the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<_> = vars.into_iter().collect();
        let mut loader = Self::builder();
        if let Some((_, path)) = vars.iter().find(|(name, _)| name == CONFIG_PATH_VAR) {
            loader = loader.add_toml_file_optional(path);
        }
        loader.with_env_vars(ENV_PREFIX, vars).build()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the facility names are unusable.
    pub fn validate(&self) -> Result<()> {
        self.facility()?;
        Ok(())
    }

    /// Builds the runtime-ready facility names.
    ///
    /// # Errors
    ///
    /// Returns an error if the class or accessor name is invalid.
    pub fn facility(&self) -> Result<Facility> {
        Ok(Facility::new(&self.facility)?)
    }

    /// Format configuration options for display, one `key = value` per line
    /// in deterministic order.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert("facility.class", self.facility.class.clone());
        options.insert("facility.accessor", self.facility.accessor.clone());
        options.insert("runtime.jni_version", self.runtime.jni_version.to_string());
        options.insert("logging.level", self.logging.level.as_u8().to_string());
        if let Some(file) = &self.logging.file {
            options.insert("logging.file", file.display().to_string());
        }

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration sources.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(path)            required
//!   .add_toml_file_optional(path)   skipped if absent
//!   .add_toml_str(text)
//!   .with_env_vars(prefix, vars)    <PREFIX>_<SECTION>__<KEY> only
//!        |
//!        v
//!    build() --> Config (validated)
//! ```
//!
//! Prefixed variables that do not address a known section, such as the
//! config path variable itself, never reach deserialization.

use std::path::Path;

use config::{Environment, File, FileFormat, Map};

use super::Config;
use crate::error::Result;

/// Sections an environment override may address.
const SECTIONS: [&str; 3] = ["facility", "runtime", "logging"];

/// Builder over the `config` crate's source stack.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
        }
    }

    /// Adds a TOML file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml).required(true));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml).required(false));
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    /// Layers `<PREFIX>_<SECTION>__<KEY>` overrides taken from `vars`.
    #[must_use]
    pub fn with_env_vars<I>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.builder = self.builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(section_overrides(prefix, vars))),
        );
        self
    }

    /// Builds and validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a source is not valid
    /// TOML, a value does not fit the `Config` structure, or the facility
    /// names fail validation.
    pub fn build(self) -> Result<Config> {
        let config: Config = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// The process environment, minus entries that are not valid Unicode.
pub(crate) fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Keeps only variables of the form `<prefix>_<section>__<key>` where
/// `section` is one of [`SECTIONS`].
pub(crate) fn section_overrides<I>(prefix: &str, vars: I) -> Map<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|rest| rest.split_once("__"))
                .is_some_and(|(section, _)| {
                    SECTIONS
                        .iter()
                        .any(|known| section.eq_ignore_ascii_case(known))
                })
        })
        .collect()
}

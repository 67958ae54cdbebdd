// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Names of the managed environment facility.

use std::ffi::{CStr, CString};

use crate::config::FacilityConfig;
use crate::error::ConfigError;

pub const DEFAULT_CLASS: &CStr = c"org/sigrok/androidutils/Environment";
pub const DEFAULT_ACCESSOR: &CStr = c"getEnvironment";

const ACCESSOR_SIGNATURE: &CStr = c"()[Ljava/lang/String;";

/// Class and accessor names, validated and NUL-terminated for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    class: CString,
    accessor: CString,
}

impl Default for Facility {
    fn default() -> Self {
        Self {
            class: CString::from(DEFAULT_CLASS),
            accessor: CString::from(DEFAULT_ACCESSOR),
        }
    }
}

impl Facility {
    /// Builds the facility from configuration.
    ///
    /// Dotted class names (`org.example.Env`) are converted to the slash
    /// form the runtime expects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for empty names, names with NUL
    /// bytes, or accessor names that are not plain identifiers.
    pub fn new(config: &FacilityConfig) -> Result<Self, ConfigError> {
        let class = config.class.trim().replace('.', "/");
        let accessor = config.accessor.trim();

        if class.is_empty() || class.starts_with('/') || class.ends_with('/') {
            return Err(invalid("class", format!("'{}' is not a class name", config.class)));
        }
        if accessor.is_empty() || accessor.contains(['/', '.', '(', ';', '[']) {
            return Err(invalid(
                "accessor",
                format!("'{}' is not a method name", config.accessor),
            ));
        }

        Ok(Self {
            class: CString::new(class)
                .map_err(|_| invalid("class", "contains a NUL byte".to_string()))?,
            accessor: CString::new(accessor)
                .map_err(|_| invalid("accessor", "contains a NUL byte".to_string()))?,
        })
    }

    #[must_use]
    pub fn class(&self) -> &CStr {
        &self.class
    }

    #[must_use]
    pub fn accessor(&self) -> &CStr {
        &self.accessor
    }

    /// Accessor signature: no arguments, returns `String[]`.
    #[must_use]
    pub const fn signature() -> &'static CStr {
        ACCESSOR_SIGNATURE
    }

    pub(crate) fn class_display(&self) -> String {
        self.class.to_string_lossy().into_owned()
    }

    pub(crate) fn accessor_display(&self) -> String {
        self.accessor.to_string_lossy().into_owned()
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: "facility".to_string(),
        key: key.to_string(),
        message,
    }
}

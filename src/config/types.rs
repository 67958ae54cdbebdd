// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```text
//! Config: FacilityConfig, RuntimeConfig, LoggingConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::importer::facility::{DEFAULT_ACCESSOR, DEFAULT_CLASS};
use crate::logging::LogLevel;
use crate::runtime::jni::JniVersion;

/// Managed-side environment facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacilityConfig {
    /// Fully-qualified class name, slash or dot separated.
    pub class: String,
    /// Static accessor returning `String[]`.
    pub accessor: String,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            class: DEFAULT_CLASS.to_string_lossy().into_owned(),
            accessor: DEFAULT_ACCESSOR.to_string_lossy().into_owned(),
        }
    }
}

/// Host runtime options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// JNI version requested from `GetEnv` and returned from `JNI_OnLoad`.
    pub jni_version: JniVersion,
}

/// Diagnostic logging. Silent unless a level is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (0-6).
    pub level: LogLevel,
    /// Optional log file, written in addition to stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::SILENT,
            file: None,
        }
    }
}

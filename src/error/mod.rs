// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                  BridgeError
//!                       |
//!   +--------+--------+-+------+--------+--------+
//!   |        |        |        |        |        |
//!   v        v        v        v        v        v
//! Runtime  Context  Attach  Descriptor Accessor Variable / Config
//! Unavail  Unavail  Failed  Unavail    Failed   (Box<ConfigError>)
//! ```
//!
//! None of these reach the embedding application: the exported entry points
//! swallow them after logging at debug level.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BridgeError`].
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Failure kinds of the environment bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No host runtime handle is installed (not loaded, or already unloaded).
    #[error("host runtime is not available")]
    RuntimeUnavailable,

    /// The runtime refused to hand out a context for this thread.
    #[error("no usable call context (status {status})")]
    ContextUnavailable { status: i32 },

    /// The calling thread could not be attached to the runtime.
    #[error("failed to attach thread to host runtime (status {status})")]
    AttachFailed { status: i32 },

    /// The facility class was not found at load time.
    #[error("environment facility class '{class}' is not available")]
    DescriptorUnavailable { class: String },

    /// The static accessor could not be invoked or returned nothing usable.
    #[error("accessor '{class}.{accessor}' did not return a string table")]
    AccessorFailed { class: String, accessor: String },

    /// A key/value pair cannot be exported as a process variable.
    #[error("cannot export variable '{name}': {reason}")]
    InvalidVariable { name: String, reason: &'static str },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),
}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Failed to parse configuration source.
    #[error("failed to parse config '{source_name}': {message}")]
    ParseError {
        source_name: String,
        message: String,
    },
}

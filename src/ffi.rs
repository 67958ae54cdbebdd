// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exported symbols.
//!
//! ```text
//! JNI_OnLoad(vm)          config --> logging --> BRIDGE.load(JniRuntime)
//! srau_init_environment() BRIDGE.import_environment(), result discarded
//! JNI_OnUnload(vm)        BRIDGE.unload() --> drop log guard
//! ```

use std::ffi::c_void;
use std::sync::{Mutex, PoisonError};

use jni_sys::{JNI_ERR, JavaVM, jint};

use crate::bridge::BridgeSlot;
use crate::config::Config;
use crate::importer::Facility;
use crate::logging::{LogConfig, LogGuard, init_logging};
use crate::runtime::jni::JniRuntime;

static BRIDGE: BridgeSlot<JniRuntime> = BridgeSlot::new();
static LOG_GUARD: Mutex<Option<LogGuard>> = Mutex::new(None);

/// Load-time configuration. Never fails: anything unusable falls back to
/// defaults.
fn load_config() -> (Config, Facility) {
    let config = Config::load().unwrap_or_else(|err| {
        tracing::debug!("ignoring invalid configuration: {err:#}");
        Config::default()
    });
    let facility = config.facility().unwrap_or_default();
    (config, facility)
}

fn start_logging(config: &Config) {
    match init_logging(&LogConfig::from(&config.logging)) {
        Ok(guard) => {
            *LOG_GUARD.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
        }
        Err(err) => tracing::debug!("logging not started: {err:#}"),
    }
    for option in config.format_options() {
        tracing::trace!("{option}");
    }
}

/// Called by the JVM when the library is loaded.
///
/// Returns the configured JNI version, or `JNI_ERR` if the loading thread has
/// no usable `JNIEnv`.
///
/// # Safety
///
/// Must only be called by the JVM with its own `JavaVM` pointer.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "system" fn JNI_OnLoad(vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    let (config, facility) = load_config();
    start_logging(&config);

    let version = config.runtime.jni_version;
    // SAFETY: the JVM passes a live VM that outlives the library.
    let Some(runtime) = (unsafe { JniRuntime::from_raw(vm, version) }) else {
        return JNI_ERR;
    };

    match BRIDGE.load(runtime, facility) {
        Ok(()) => version.as_raw(),
        Err(err) => {
            tracing::debug!("JNI_OnLoad: {err}");
            JNI_ERR
        }
    }
}

/// Called by the JVM when the class loader holding the library is collected.
///
/// # Safety
///
/// Must only be called by the JVM.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "system" fn JNI_OnUnload(_vm: *mut JavaVM, _reserved: *mut c_void) {
    BRIDGE.unload();
    LOG_GUARD
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

/// Copies the Java-side environment table into the process environment.
///
/// Safe to call from any thread at any time. Does nothing if the library is
/// not loaded or the table cannot be read; failures are not reported.
#[unsafe(no_mangle)]
pub extern "C" fn srau_init_environment() {
    if let Err(err) = BRIDGE.import_environment() {
        tracing::debug!("environment not imported: {err}");
    }
}

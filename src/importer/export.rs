// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Writes marshalled strings into the process environment.

use std::ffi::{CStr, OsStr};

use crate::error::{BridgeError, BridgeResult};

/// Sets `key` to `value`, replacing any existing value.
///
/// Bytes are passed through unchanged on Unix. Elsewhere they are decoded
/// lossily, since the platform expects UTF-16.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidVariable`] if `key` is empty or contains
/// `=`; the environment is left untouched in that case.
pub fn set_variable(key: &CStr, value: &CStr) -> BridgeResult<()> {
    let key_bytes = key.to_bytes();
    if key_bytes.is_empty() {
        return Err(invalid(key, "name is empty"));
    }
    if key_bytes.contains(&b'=') {
        return Err(invalid(key, "name contains '='"));
    }

    let key = to_os(key);
    let value = to_os(value);

    // SAFETY: the process environment is shared and unsynchronised; callers
    // of the import accept that concurrent readers (e.g. getenv from another
    // thread) race with this write, exactly as with setenv(3).
    unsafe { std::env::set_var(&*key, &*value) };
    Ok(())
}

#[cfg(unix)]
fn to_os(s: &CStr) -> std::borrow::Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(OsStr::from_bytes(s.to_bytes()))
}

#[cfg(not(unix))]
fn to_os(s: &CStr) -> std::borrow::Cow<'_, OsStr> {
    std::borrow::Cow::Owned(s.to_string_lossy().into_owned().into())
}

fn invalid(key: &CStr, reason: &'static str) -> BridgeError {
    BridgeError::InvalidVariable {
        name: key.to_string_lossy().into_owned(),
        reason,
    }
}

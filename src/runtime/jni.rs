// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! JNI implementation of [`HostRuntime`] and [`CallContext`].
//!
//! ```text
//! JniRuntime  *mut JavaVM   GetEnv / AttachCurrentThread / DetachCurrentThread
//! JniContext  *mut JNIEnv   FindClass, refs, CallStaticObjectMethodA, arrays
//! JniChars    GetStringUTFChars .. ReleaseStringUTFChars
//! ```
//!
//! Every call that can throw is followed by `ExceptionCheck`; a pending
//! exception is cleared and the call reports `None`.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use jni_sys::{
    JNI_EDETACHED, JNI_ERR, JNI_OK, JNI_TRUE, JNIEnv, JNINativeInterface_, JavaVM, jint,
    jobject, jsize,
};
use serde::{Deserialize, Serialize};

use super::{CallContext, ContextStatus, HostRuntime};
use crate::error::{BridgeError, BridgeResult, ConfigError};

/// JNI interface version requested from the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JniVersion {
    V1_1,
    V1_2,
    V1_4,
    #[default]
    V1_6,
    V1_8,
    V9,
    V10,
}

impl JniVersion {
    /// Returns the `JNI_VERSION_*` constant.
    #[must_use]
    pub const fn as_raw(self) -> jint {
        match self {
            Self::V1_1 => 0x0001_0001,
            Self::V1_2 => 0x0001_0002,
            Self::V1_4 => 0x0001_0004,
            Self::V1_6 => 0x0001_0006,
            Self::V1_8 => 0x0001_0008,
            Self::V9 => 0x0009_0000,
            Self::V10 => 0x000a_0000,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_4 => "1.4",
            Self::V1_6 => "1.6",
            Self::V1_8 => "1.8",
            Self::V9 => "9",
            Self::V10 => "10",
        }
    }
}

impl std::fmt::Display for JniVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JniVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            "1.4" => Ok(Self::V1_4),
            "1.6" => Ok(Self::V1_6),
            "1.8" => Ok(Self::V1_8),
            "9" => Ok(Self::V9),
            "10" => Ok(Self::V10),
            other => Err(ConfigError::InvalidValue {
                section: "runtime".to_string(),
                key: "jni_version".to_string(),
                message: format!("expected one of 1.1, 1.2, 1.4, 1.6, 1.8, 9, 10; got '{other}'"),
            }),
        }
    }
}

impl TryFrom<String> for JniVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JniVersion> for String {
    fn from(version: JniVersion) -> Self {
        version.as_str().to_string()
    }
}

/// Calls a function from the JNI function table, yielding `None` if the
/// table slot is empty.
macro_rules! jni_call {
    ($ctx:expr, $name:ident $(, $arg:expr)* $(,)?) => {
        match $ctx.functions().$name {
            // SAFETY: `env` is the calling thread's live JNIEnv and the
            // arguments are handles obtained from it.
            Some(function) => Some(unsafe { function($ctx.env $(, $arg)*) }),
            None => None,
        }
    };
}

/// A JNI object handle.
///
/// Local handles are only meaningful on the thread that created them; the
/// [`super::Local`] wrapper ties them to that thread's context by lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JObject(jobject);

// SAFETY: a handle is an opaque pointer-sized token. Global handles are valid
// on every thread; local handles are only dereferenced through the context
// that owns them.
unsafe impl Send for JObject {}
unsafe impl Sync for JObject {}

impl JObject {
    fn from_raw(object: jobject) -> Option<Self> {
        (!object.is_null()).then_some(Self(object))
    }
}

/// The process-wide `JavaVM`.
#[derive(Debug)]
pub struct JniRuntime {
    vm: *mut JavaVM,
    version: JniVersion,
}

// SAFETY: the JNI invocation interface may be used from any thread.
unsafe impl Send for JniRuntime {}
unsafe impl Sync for JniRuntime {}

impl JniRuntime {
    /// Wraps the VM pointer handed to `JNI_OnLoad`.
    ///
    /// # Safety
    ///
    /// `vm` must be null or point to a live `JavaVM` that outlives the
    /// returned value.
    #[must_use]
    pub unsafe fn from_raw(vm: *mut JavaVM, version: JniVersion) -> Option<Self> {
        (!vm.is_null()).then_some(Self { vm, version })
    }

    #[must_use]
    pub const fn version(&self) -> JniVersion {
        self.version
    }

    fn invoke_interface(&self) -> &jni_sys::JNIInvokeInterface_ {
        // SAFETY: `vm` is non-null and live per `from_raw`.
        unsafe { &**self.vm }
    }
}

impl HostRuntime for JniRuntime {
    type Context = JniContext;

    fn current_context(&self) -> ContextStatus<JniContext> {
        let Some(get_env) = self.invoke_interface().GetEnv else {
            return ContextStatus::Failed(JNI_ERR);
        };

        let mut env: *mut c_void = ptr::null_mut();
        // SAFETY: `vm` is live; `env` is a valid out-pointer.
        let status = unsafe { get_env(self.vm, &raw mut env, self.version.as_raw()) };

        match status {
            JNI_OK if !env.is_null() => ContextStatus::Attached(JniContext { env: env.cast() }),
            JNI_OK => ContextStatus::Failed(JNI_ERR),
            JNI_EDETACHED => ContextStatus::Detached,
            other => ContextStatus::Failed(other),
        }
    }

    fn attach_current_thread(&self) -> BridgeResult<JniContext> {
        let Some(attach) = self.invoke_interface().AttachCurrentThread else {
            return Err(BridgeError::AttachFailed { status: JNI_ERR });
        };

        let mut env: *mut c_void = ptr::null_mut();
        // SAFETY: `vm` is live; null thread arguments request defaults.
        let status = unsafe { attach(self.vm, &raw mut env, ptr::null_mut()) };

        if status == JNI_OK && !env.is_null() {
            Ok(JniContext { env: env.cast() })
        } else {
            Err(BridgeError::AttachFailed { status })
        }
    }

    fn detach_current_thread(&self) {
        if let Some(detach) = self.invoke_interface().DetachCurrentThread {
            // SAFETY: only called for a thread this process attached.
            let status = unsafe { detach(self.vm) };
            if status != JNI_OK {
                tracing::debug!(status, "DetachCurrentThread failed");
            }
        }
    }
}

/// A thread's `JNIEnv`. Not `Send`: it is only valid on the owning thread.
#[derive(Debug)]
pub struct JniContext {
    env: *mut JNIEnv,
}

impl JniContext {
    fn functions(&self) -> &JNINativeInterface_ {
        // SAFETY: `env` came from GetEnv/AttachCurrentThread on this thread.
        unsafe { &**self.env }
    }

    /// Clears a pending exception, returning whether there was one.
    fn clear_exception(&self) -> bool {
        let pending = jni_call!(self, ExceptionCheck).is_some_and(|flag| flag == JNI_TRUE);
        if pending {
            jni_call!(self, ExceptionClear);
            tracing::debug!("cleared pending Java exception");
        }
        pending
    }

    /// Converts a returned handle, treating a pending exception as failure.
    fn checked(&self, object: Option<jobject>) -> Option<JObject> {
        let object = object.and_then(JObject::from_raw);
        if self.clear_exception() {
            if let Some(object) = object {
                self.delete_local_ref(object);
            }
            return None;
        }
        object
    }
}

impl CallContext for JniContext {
    type Object = JObject;
    type Chars<'a> = JniChars<'a>;

    fn find_class(&self, name: &CStr) -> Option<JObject> {
        self.checked(jni_call!(self, FindClass, name.as_ptr()))
    }

    fn new_local_ref(&self, object: JObject) -> Option<JObject> {
        jni_call!(self, NewLocalRef, object.0).and_then(JObject::from_raw)
    }

    fn delete_local_ref(&self, object: JObject) {
        jni_call!(self, DeleteLocalRef, object.0);
    }

    fn new_global_ref(&self, object: JObject) -> Option<JObject> {
        jni_call!(self, NewGlobalRef, object.0).and_then(JObject::from_raw)
    }

    fn delete_global_ref(&self, object: JObject) {
        jni_call!(self, DeleteGlobalRef, object.0);
    }

    fn call_static_object_method(
        &self,
        class: JObject,
        name: &CStr,
        signature: &CStr,
    ) -> Option<JObject> {
        let method = jni_call!(self, GetStaticMethodID, class.0, name.as_ptr(), signature.as_ptr())
            .filter(|method| !method.is_null());
        if self.clear_exception() {
            return None;
        }
        let method = method?;

        self.checked(jni_call!(
            self,
            CallStaticObjectMethodA,
            class.0,
            method,
            ptr::null()
        ))
    }

    fn array_length(&self, array: JObject) -> usize {
        jni_call!(self, GetArrayLength, array.0)
            .and_then(|length| usize::try_from(length).ok())
            .unwrap_or(0)
    }

    fn array_element(&self, array: JObject, index: usize) -> Option<JObject> {
        let index = jsize::try_from(index).ok()?;
        self.checked(jni_call!(self, GetObjectArrayElement, array.0, index))
    }

    fn string_chars(&self, string: JObject) -> Option<JniChars<'_>> {
        let chars = jni_call!(self, GetStringUTFChars, string.0, ptr::null_mut())?;
        if chars.is_null() {
            self.clear_exception();
            return None;
        }
        Some(JniChars {
            context: self,
            string,
            chars,
        })
    }
}

/// Modified UTF-8 contents of a Java string, released on drop.
pub struct JniChars<'a> {
    context: &'a JniContext,
    string: JObject,
    chars: *const c_char,
}

impl AsRef<CStr> for JniChars<'_> {
    fn as_ref(&self) -> &CStr {
        // SAFETY: GetStringUTFChars returns a NUL-terminated buffer that stays
        // valid until ReleaseStringUTFChars.
        unsafe { CStr::from_ptr(self.chars) }
    }
}

impl Drop for JniChars<'_> {
    fn drop(&mut self) {
        jni_call!(self.context, ReleaseStringUTFChars, self.string.0, self.chars);
    }
}

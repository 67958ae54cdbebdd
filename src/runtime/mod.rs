// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host runtime access.
//!
//! ```text
//! HostRuntime (process-wide, Send + Sync)
//!   current_context()      --> Attached(ctx) | Detached | Failed(status)
//!   attach_current_thread() --> ctx
//!   detach_current_thread()
//!
//! ContextGuard::acquire(&runtime)
//!   Attached  --> AlreadyAttached, drop() does nothing
//!   Detached  --> attach, JustAttached, drop() detaches
//!
//! CallContext (valid on one thread only)
//!   Local<'ctx>  transient refs, deleted on drop
//!   Global       durable refs, released once via a context
//! ```

pub mod jni;
pub mod refs;

#[cfg(test)]
pub(crate) mod mock;


use std::ffi::CStr;

use crate::error::{BridgeError, BridgeResult};

pub use refs::{Global, Local};

/// Result of asking the runtime for the calling thread's context.
#[derive(Debug)]
pub enum ContextStatus<C> {
    /// The thread is already known to the runtime.
    Attached(C),
    /// The thread is unknown and must be attached first.
    Detached,
    /// The runtime rejected the request (e.g. unsupported version).
    Failed(i32),
}

/// How the context held by a [`ContextGuard`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// The thread was attached before the guard existed.
    AlreadyAttached,
    /// The guard attached the thread and will detach it.
    JustAttached,
}

/// The host runtime instance, shared by every thread.
pub trait HostRuntime: Send + Sync {
    type Context: CallContext;

    /// Returns the calling thread's context without attaching it.
    fn current_context(&self) -> ContextStatus<Self::Context>;

    /// Attaches the calling thread and returns its new context.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::AttachFailed`] if the runtime refuses.
    fn attach_current_thread(&self) -> BridgeResult<Self::Context>;

    /// Detaches the calling thread.
    fn detach_current_thread(&self);
}

/// Operations the bridge performs through a per-thread call context.
///
/// Objects are raw handles; ownership is expressed by wrapping them in
/// [`Local`] or [`Global`], which call the matching delete operation.
/// Methods returning `None` have already cleared any pending managed
/// exception.
pub trait CallContext {
    /// Raw object handle.
    type Object: Copy + Send + Sync + 'static;

    /// Marshalled native string; releases the runtime buffer on drop.
    type Chars<'a>: AsRef<CStr>
    where
        Self: 'a;

    /// Looks up a class by its slash-separated binary name.
    fn find_class(&self, name: &CStr) -> Option<Self::Object>;

    fn new_local_ref(&self, object: Self::Object) -> Option<Self::Object>;

    fn delete_local_ref(&self, object: Self::Object);

    fn new_global_ref(&self, object: Self::Object) -> Option<Self::Object>;

    fn delete_global_ref(&self, object: Self::Object);

    /// Invokes a static no-argument method returning an object.
    fn call_static_object_method(
        &self,
        class: Self::Object,
        name: &CStr,
        signature: &CStr,
    ) -> Option<Self::Object>;

    /// Returns the length of an object array.
    fn array_length(&self, array: Self::Object) -> usize;

    /// Returns the element at `index`, or `None` for a null element.
    ///
    /// `index` must be below [`CallContext::array_length`].
    fn array_element(&self, array: Self::Object, index: usize) -> Option<Self::Object>;

    /// Copies a managed string into a native buffer.
    fn string_chars(&self, string: Self::Object) -> Option<Self::Chars<'_>>;
}

/// Shorthand for the object handle type of a runtime.
pub type ObjectOf<R> = <<R as HostRuntime>::Context as CallContext>::Object;

/// Scoped call context: acquiring may attach the thread, dropping detaches it
/// again if and only if this guard attached it.
pub struct ContextGuard<'r, R: HostRuntime> {
    runtime: &'r R,
    context: R::Context,
    mode: AttachMode,
}

impl<'r, R: HostRuntime> ContextGuard<'r, R> {
    /// Obtains a context for the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ContextUnavailable`] if the runtime rejects the
    /// request outright, or [`BridgeError::AttachFailed`] if the thread is
    /// unknown and attaching it fails.
    pub fn acquire(runtime: &'r R) -> BridgeResult<Self> {
        match runtime.current_context() {
            ContextStatus::Attached(context) => Ok(Self {
                runtime,
                context,
                mode: AttachMode::AlreadyAttached,
            }),
            ContextStatus::Detached => {
                let context = runtime.attach_current_thread()?;
                tracing::trace!("attached native thread to host runtime");
                Ok(Self {
                    runtime,
                    context,
                    mode: AttachMode::JustAttached,
                })
            }
            ContextStatus::Failed(status) => Err(BridgeError::ContextUnavailable { status }),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &R::Context {
        &self.context
    }

    #[must_use]
    pub const fn mode(&self) -> AttachMode {
        self.mode
    }
}

impl<R: HostRuntime> Drop for ContextGuard<'_, R> {
    fn drop(&mut self) {
        if self.mode == AttachMode::JustAttached {
            self.runtime.detach_current_thread();
            tracing::trace!("detached native thread from host runtime");
        }
    }
}

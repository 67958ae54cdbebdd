// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transient and durable object references.
//!
//! ```text
//! Local<'ctx, C>  borrowed from one call context, deleted on drop
//!      | Global::promote()
//!      v
//! Global<O>       owned by the process, outlives any call
//!      | to_local(ctx)          | release(ctx)
//!      v                        v
//! Local<'ctx, C>            deleted exactly once
//! ```

use super::CallContext;

/// A transient reference valid only while its call context is.
pub struct Local<'c, C: CallContext> {
    context: &'c C,
    object: C::Object,
}

impl<'c, C: CallContext> Local<'c, C> {
    /// Takes ownership of a local handle produced by `context`.
    pub const fn from_raw(context: &'c C, object: C::Object) -> Self {
        Self { context, object }
    }

    /// Returns the raw handle. It stays valid until `self` is dropped.
    #[must_use]
    pub const fn get(&self) -> C::Object {
        self.object
    }

    #[must_use]
    pub const fn context(&self) -> &'c C {
        self.context
    }
}

impl<C: CallContext> Drop for Local<'_, C> {
    fn drop(&mut self) {
        self.context.delete_local_ref(self.object);
    }
}

/// A durable reference that survives across independent native calls.
///
/// Has no `Drop`: deleting it needs a call context, so it must be handed back
/// through [`Global::release`]. One dropped without release stays pinned
/// until the runtime itself goes away.
#[derive(Debug)]
pub struct Global<O> {
    object: O,
}

impl<O: Copy + Send + Sync + 'static> Global<O> {
    /// Promotes a transient reference into a durable one.
    ///
    /// The transient reference is left untouched; the caller still drops it.
    pub fn promote<C>(local: &Local<'_, C>) -> Option<Self>
    where
        C: CallContext<Object = O>,
    {
        local
            .context()
            .new_global_ref(local.get())
            .map(|object| Self { object })
    }

    /// Derives a transient reference for use within one call.
    pub fn to_local<'c, C>(&self, context: &'c C) -> Option<Local<'c, C>>
    where
        C: CallContext<Object = O>,
    {
        context
            .new_local_ref(self.object)
            .map(|object| Local::from_raw(context, object))
    }

    /// Releases the durable reference.
    pub fn release<C>(self, context: &C)
    where
        C: CallContext<Object = O>,
    {
        context.delete_global_ref(self.object);
    }
}

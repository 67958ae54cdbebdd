// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Durable cache of the environment facility's class descriptor.
//!
//! ```text
//! load(ctx, name)   FindClass --> Local --promote--> Global   (once)
//! get(ctx)          Global --> Local                          (per import)
//! unload(ctx)       Global --> released, cache empty          (idempotent)
//! ```

use std::ffi::CStr;

use crate::runtime::{CallContext, Global, Local};


/// Holds at most one durable class reference.
#[derive(Debug)]
pub struct DescriptorCache<O> {
    entry: Option<Global<O>>,
}

impl<O> Default for DescriptorCache<O> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<O: Copy + Send + Sync + 'static> DescriptorCache<O> {
    /// Looks up `class_name` and keeps a durable reference to it.
    ///
    /// A missing class leaves the cache empty; loading still succeeds.
    pub fn load<C>(context: &C, class_name: &CStr) -> Self
    where
        C: CallContext<Object = O>,
    {
        let entry = context
            .find_class(class_name)
            .map(|class| Local::from_raw(context, class))
            .and_then(|local| Global::promote(&local));

        if entry.is_none() {
            tracing::debug!(class = ?class_name, "environment facility class not found");
        }

        Self { entry }
    }

    /// Returns a call-scoped reference to the cached class.
    pub fn get<'c, C>(&self, context: &'c C) -> Option<Local<'c, C>>
    where
        C: CallContext<Object = O>,
    {
        self.entry.as_ref()?.to_local(context)
    }

    /// Releases the durable reference. Safe to call on an empty cache.
    pub fn unload<C>(&mut self, context: &C)
    where
        C: CallContext<Object = O>,
    {
        if let Some(entry) = self.entry.take() {
            entry.release(context);
        }
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.entry.is_some()
    }
}

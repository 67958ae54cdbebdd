// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process-wide bridge state and its load/unload lifecycle.
//!
//! ```text
//! BridgeSlot (static, one per process)
//!   load(runtime, facility)
//!     current_context() --Attached--> DescriptorCache::load --> slot = Some
//!                       --otherwise-> Err, slot untouched
//!   import_environment()
//!     slot None --> RuntimeUnavailable
//!     ContextGuard::acquire --> DescriptorCache::get --> importer
//!   unload()
//!     slot = None, then DescriptorCache::unload if a context exists
//! ```
//!
//! Writes happen only in `load`/`unload`, which the host runtime never runs
//! concurrently with imports; the lock only satisfies `Sync` for the static.

use std::sync::{PoisonError, RwLock};

use crate::descriptor::DescriptorCache;
use crate::error::{BridgeError, BridgeResult};
use crate::importer::{self, Facility, ImportSummary};
use crate::runtime::{ContextGuard, ContextStatus, HostRuntime, ObjectOf};


/// A loaded bridge: the runtime handle plus the cached facility class.
pub struct Bridge<R: HostRuntime> {
    runtime: R,
    descriptor: DescriptorCache<ObjectOf<R>>,
    facility: Facility,
}

impl<R: HostRuntime> Bridge<R> {
    /// Binds to `runtime` using the loading thread's context.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ContextUnavailable`] if the loading thread has
    /// no context. A missing facility class is not an error.
    pub fn load(runtime: R, facility: Facility) -> BridgeResult<Self> {
        let descriptor = match runtime.current_context() {
            ContextStatus::Attached(context) => DescriptorCache::load(&context, facility.class()),
            ContextStatus::Detached => {
                return Err(BridgeError::ContextUnavailable {
                    status: jni_sys::JNI_EDETACHED,
                });
            }
            ContextStatus::Failed(status) => {
                return Err(BridgeError::ContextUnavailable { status });
            }
        };

        Ok(Self {
            runtime,
            descriptor,
            facility,
        })
    }

    /// Releases the cached class if the calling thread has a context.
    pub fn unload(mut self) {
        if let ContextStatus::Attached(context) = self.runtime.current_context() {
            self.descriptor.unload(&context);
        } else {
            tracing::debug!("no context at unload; durable class reference left to the runtime");
        }
    }

    /// Runs one full import on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the reason nothing was imported: the thread could not get a
    /// context, or the facility class is not cached.
    pub fn import_environment(&self) -> BridgeResult<ImportSummary> {
        let guard = ContextGuard::acquire(&self.runtime)?;
        let context = guard.context();

        let class =
            self.descriptor
                .get(context)
                .ok_or_else(|| BridgeError::DescriptorUnavailable {
                    class: self.facility.class_display(),
                })?;

        Ok(importer::import_environment(context, &class, &self.facility))
    }

    #[must_use]
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    #[must_use]
    pub const fn has_descriptor(&self) -> bool {
        self.descriptor.is_populated()
    }
}

/// Holder for the process-wide [`Bridge`]: empty before load and after
/// unload.
pub struct BridgeSlot<R: HostRuntime> {
    inner: RwLock<Option<Bridge<R>>>,
}

impl<R: HostRuntime> Default for BridgeSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HostRuntime> BridgeSlot<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Loads the bridge into the slot.
    ///
    /// On failure the slot keeps whatever it held before. A bridge that is
    /// already loaded is unloaded first.
    ///
    /// # Errors
    ///
    /// Propagates [`Bridge::load`] failures.
    pub fn load(&self, runtime: R, facility: Facility) -> BridgeResult<()> {
        let bridge = Bridge::load(runtime, facility)?;
        tracing::debug!(
            descriptor = bridge.has_descriptor(),
            "environment bridge loaded"
        );

        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(bridge);
        if let Some(previous) = previous {
            previous.unload();
        }
        Ok(())
    }

    /// Clears the slot and releases the cached class. Idempotent.
    pub fn unload(&self) {
        let bridge = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(bridge) = bridge {
            bridge.unload();
            tracing::debug!("environment bridge unloaded");
        }
    }

    /// Imports the managed environment table into the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::RuntimeUnavailable`] when nothing is loaded,
    /// or the reason [`Bridge::import_environment`] did nothing.
    pub fn import_environment(&self) -> BridgeResult<ImportSummary> {
        let slot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let bridge = slot.as_ref().ok_or(BridgeError::RuntimeUnavailable)?;
        let summary = bridge.import_environment()?;
        tracing::debug!(
            pairs = summary.pairs,
            exported = summary.exported,
            skipped = summary.skipped,
            "environment imported"
        );
        Ok(summary)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Instrumented in-memory runtime for tests.
//!
//! Tracks attach/detach calls per thread and the number of live local refs,
//! global refs and marshalled buffers so tests can assert nothing leaks.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::ThreadId;

use super::{CallContext, ContextStatus, HostRuntime};
use crate::error::{BridgeError, BridgeResult};
use crate::importer::Facility;
use crate::importer::facility::{DEFAULT_ACCESSOR, DEFAULT_CLASS};

pub(crate) const CLASS_NAME: &CStr = DEFAULT_CLASS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockObject {
    Class,
    Table,
    Str(usize),
}

#[derive(Debug, Default)]
pub(crate) struct MockState {
    /// `None` makes the accessor fail.
    table: Mutex<Option<Vec<Option<String>>>>,
    class_missing: AtomicBool,
    attach_fails: AtomicBool,
    env_fails: AtomicBool,
    known_threads: Mutex<HashSet<ThreadId>>,
    pub(crate) attaches: AtomicUsize,
    pub(crate) detaches: AtomicUsize,
    pub(crate) class_lookups: AtomicUsize,
    pub(crate) accessor_calls: AtomicUsize,
    pub(crate) live_locals: AtomicIsize,
    pub(crate) live_globals: AtomicIsize,
    pub(crate) live_chars: AtomicIsize,
}

/// Cloning shares state, so a test can keep a handle after moving the
/// runtime into a bridge.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockRuntime {
    state: Arc<MockState>,
}

impl MockRuntime {
    pub(crate) fn with_table(entries: &[&str]) -> Self {
        let runtime = Self::default();
        runtime.set_table(entries);
        runtime
    }

    pub(crate) fn state(&self) -> &MockState {
        &self.state
    }

    pub(crate) fn set_table(&self, entries: &[&str]) {
        self.set_raw_table(Some(entries.iter().map(|s| Some((*s).to_string())).collect()));
    }

    pub(crate) fn set_raw_table(&self, entries: Option<Vec<Option<String>>>) {
        *self
            .state
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = entries;
    }

    pub(crate) fn set_class_missing(&self, missing: bool) {
        self.state.class_missing.store(missing, Ordering::SeqCst);
    }

    pub(crate) fn set_attach_fails(&self, fails: bool) {
        self.state.attach_fails.store(fails, Ordering::SeqCst);
    }

    pub(crate) fn set_env_fails(&self, fails: bool) {
        self.state.env_fails.store(fails, Ordering::SeqCst);
    }

    /// Registers the calling thread as one the runtime created itself.
    pub(crate) fn adopt_current_thread(&self) {
        self.known_threads().insert(std::thread::current().id());
    }

    pub(crate) fn forget_current_thread(&self) {
        self.known_threads().remove(&std::thread::current().id());
    }

    pub(crate) fn is_current_thread_known(&self) -> bool {
        self.known_threads()
            .contains(&std::thread::current().id())
    }

    pub(crate) fn attaches(&self) -> usize {
        self.state.attaches.load(Ordering::SeqCst)
    }

    pub(crate) fn detaches(&self) -> usize {
        self.state.detaches.load(Ordering::SeqCst)
    }

    pub(crate) fn live_locals(&self) -> isize {
        self.state.live_locals.load(Ordering::SeqCst)
    }

    pub(crate) fn live_globals(&self) -> isize {
        self.state.live_globals.load(Ordering::SeqCst)
    }

    pub(crate) fn live_chars(&self) -> isize {
        self.state.live_chars.load(Ordering::SeqCst)
    }

    fn known_threads(&self) -> std::sync::MutexGuard<'_, HashSet<ThreadId>> {
        self.state
            .known_threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn context(&self) -> MockContext {
        MockContext {
            state: Arc::clone(&self.state),
            snapshot: RefCell::new(Vec::new()),
        }
    }
}

impl HostRuntime for MockRuntime {
    type Context = MockContext;

    fn current_context(&self) -> ContextStatus<MockContext> {
        if self.state.env_fails.load(Ordering::SeqCst) {
            ContextStatus::Failed(-3)
        } else if self.is_current_thread_known() {
            ContextStatus::Attached(self.context())
        } else {
            ContextStatus::Detached
        }
    }

    fn attach_current_thread(&self) -> BridgeResult<MockContext> {
        if self.state.attach_fails.load(Ordering::SeqCst) {
            return Err(BridgeError::AttachFailed { status: -1 });
        }
        let inserted = self.known_threads().insert(std::thread::current().id());
        assert!(inserted, "attach of an already attached thread");
        self.state.attaches.fetch_add(1, Ordering::SeqCst);
        Ok(self.context())
    }

    fn detach_current_thread(&self) {
        let removed = self.known_threads().remove(&std::thread::current().id());
        assert!(removed, "detach of a thread that is not attached");
        self.state.detaches.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub(crate) struct MockContext {
    state: Arc<MockState>,
    snapshot: RefCell<Vec<Option<String>>>,
}

impl MockContext {
    fn new_local(&self, object: MockObject) -> MockObject {
        self.state.live_locals.fetch_add(1, Ordering::SeqCst);
        object
    }
}

pub(crate) struct MockChars<'a> {
    state: &'a MockState,
    value: CString,
}

impl AsRef<CStr> for MockChars<'_> {
    fn as_ref(&self) -> &CStr {
        &self.value
    }
}

impl Drop for MockChars<'_> {
    fn drop(&mut self) {
        self.state.live_chars.fetch_sub(1, Ordering::SeqCst);
    }
}

impl CallContext for MockContext {
    type Object = MockObject;
    type Chars<'a> = MockChars<'a>;

    fn find_class(&self, name: &CStr) -> Option<MockObject> {
        self.state.class_lookups.fetch_add(1, Ordering::SeqCst);
        let found = !self.state.class_missing.load(Ordering::SeqCst)
            && name == CLASS_NAME;
        found.then(|| self.new_local(MockObject::Class))
    }

    fn new_local_ref(&self, object: MockObject) -> Option<MockObject> {
        Some(self.new_local(object))
    }

    fn delete_local_ref(&self, _object: MockObject) {
        self.state.live_locals.fetch_sub(1, Ordering::SeqCst);
    }

    fn new_global_ref(&self, object: MockObject) -> Option<MockObject> {
        self.state.live_globals.fetch_add(1, Ordering::SeqCst);
        Some(object)
    }

    fn delete_global_ref(&self, _object: MockObject) {
        self.state.live_globals.fetch_sub(1, Ordering::SeqCst);
    }

    fn call_static_object_method(
        &self,
        class: MockObject,
        name: &CStr,
        signature: &CStr,
    ) -> Option<MockObject> {
        assert_eq!(class, MockObject::Class);
        self.state.accessor_calls.fetch_add(1, Ordering::SeqCst);
        if name != DEFAULT_ACCESSOR || signature != Facility::signature() {
            return None;
        }
        let table = self
            .state
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        *self.snapshot.borrow_mut() = table;
        Some(self.new_local(MockObject::Table))
    }

    fn array_length(&self, array: MockObject) -> usize {
        assert_eq!(array, MockObject::Table);
        self.snapshot.borrow().len()
    }

    fn array_element(&self, array: MockObject, index: usize) -> Option<MockObject> {
        assert_eq!(array, MockObject::Table);
        let snapshot = self.snapshot.borrow();
        assert!(index < snapshot.len(), "array index {index} out of bounds");
        snapshot[index]
            .as_ref()
            .map(|_| self.new_local(MockObject::Str(index)))
    }

    fn string_chars(&self, string: MockObject) -> Option<MockChars<'_>> {
        let MockObject::Str(index) = string else {
            panic!("string_chars on non-string {string:?}");
        };
        let value = self.snapshot.borrow()[index].clone()?;
        let value = CString::new(value).ok()?;
        self.state.live_chars.fetch_add(1, Ordering::SeqCst);
        Some(MockChars {
            state: &self.state,
            value,
        })
    }
}

/// Serialises tests that write to the process environment.
pub(crate) static ENV_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

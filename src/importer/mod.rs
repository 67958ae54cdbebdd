// srau: sigrok Android utilities - environment bridge
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment import.
//!
//! ```text
//! import_environment(ctx, class)
//!   accessor()  --> String[] { k0, v0, k1, v1, ... }   (null/throw => empty)
//!   for i in 0..len/2:
//!     k = table[2i], v = table[2i + 1]
//!     marshal --> export (overwrite) --> release buffers and refs
//! ```
//!
//! A trailing unpaired entry is ignored. A pair with a null element or a
//! name that cannot be a process variable is skipped.

pub mod export;
pub mod facility;


pub use facility::Facility;

use crate::error::{BridgeError, BridgeResult};
use crate::runtime::{CallContext, Local};

/// Outcome of one import, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Complete key/value pairs found in the table.
    pub pairs: usize,
    /// Pairs written to the process environment.
    pub exported: usize,
    /// Pairs dropped because an element was null or the name was invalid.
    pub skipped: usize,
}

/// Number of complete pairs in a table of `len` entries.
#[must_use]
pub const fn pair_count(len: usize) -> usize {
    len / 2
}

/// Reads the facility's table through `context` and exports every pair.
///
/// An accessor that throws or returns null yields an empty table: the
/// summary is all zeros and no variable is touched.
pub fn import_environment<C: CallContext>(
    context: &C,
    class: &Local<'_, C>,
    facility: &Facility,
) -> ImportSummary {
    let Some(table) = context
        .call_static_object_method(class.get(), facility.accessor(), Facility::signature())
        .map(|table| Local::from_raw(context, table))
    else {
        tracing::debug!(
            "{}",
            BridgeError::AccessorFailed {
                class: facility.class_display(),
                accessor: facility.accessor_display(),
            }
        );
        return ImportSummary::default();
    };

    let mut summary = ImportSummary {
        pairs: pair_count(context.array_length(table.get())),
        ..ImportSummary::default()
    };

    for pair in 0..summary.pairs {
        match import_pair(context, &table, pair) {
            Ok(()) => summary.exported += 1,
            Err(err) => {
                tracing::debug!(pair, "skipping environment entry: {err}");
                summary.skipped += 1;
            }
        }
    }

    summary
}

fn import_pair<C: CallContext>(
    context: &C,
    table: &Local<'_, C>,
    pair: usize,
) -> BridgeResult<()> {
    let key = element(context, table, pair * 2)?;
    let value = element(context, table, pair * 2 + 1)?;

    let key_chars = context
        .string_chars(key.get())
        .ok_or_else(|| null_entry("key could not be read"))?;
    let value_chars = context
        .string_chars(value.get())
        .ok_or_else(|| null_entry("value could not be read"))?;

    export::set_variable(key_chars.as_ref(), value_chars.as_ref())
}

fn element<'c, C: CallContext>(
    context: &'c C,
    table: &Local<'_, C>,
    index: usize,
) -> BridgeResult<Local<'c, C>> {
    context
        .array_element(table.get(), index)
        .map(|object| Local::from_raw(context, object))
        .ok_or_else(|| BridgeError::InvalidVariable {
            name: format!("#{index}"),
            reason: "table entry is null",
        })
}

fn null_entry(reason: &'static str) -> BridgeError {
    BridgeError::InvalidVariable {
        name: String::new(),
        reason,
    }
}

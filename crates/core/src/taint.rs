// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ephemeral taint propagation

use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
use crate::marks::{Mark, MarkedValue, PathMarks};
use crate::value::{Path, Value};

/// Turn a provider result into the caller-visible value of an ephemeral
/// resource instance
///
/// The configuration's marks go back onto the result first, then the whole
/// value is marked ephemeral on top of them.
pub fn taint_ephemeral(result: Value, config_marks: &PathMarks) -> MarkedValue {
    MarkedValue::new(result)
        .mark_with_paths(config_marks)
        .mark(Mark::Ephemeral)
}

/// Refuse a value headed for a durable artifact if any part of it is
/// ephemeral
///
/// `what` names the destination, e.g. "resource state" or "plan output".
pub fn reject_ephemeral(value: &MarkedValue, what: &str) -> Diagnostics {
    value
        .marks()
        .paths_with(Mark::Ephemeral)
        .into_iter()
        .map(|path| ephemeral_not_allowed(path, what))
        .collect()
}

fn ephemeral_not_allowed(path: &Path, what: &str) -> Diagnostic {
    let detail = if path.is_root() {
        format!("This value is ephemeral and cannot be written to {}.", what)
    } else {
        format!(
            "The value at {} is ephemeral and cannot be written to {}.",
            path, what
        )
    };
    Diagnostic::attribute_value(
        Severity::Error,
        "Ephemeral value not allowed",
        detail,
        path.clone(),
    )
}

// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-broadcast delivery reports.

use std::any::Any;
use std::fmt;

use crate::registry::HandlerId;

/// A handler that panicked while handling a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFault {
    pub handler: HandlerId,
    /// Label the handler was connected under.
    pub label: String,
    pub operation: &'static str,
    /// The panic message, when the payload was a string.
    pub message: String,
}

impl fmt::Display for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) panicked during {}: {}",
            self.label, self.handler, self.operation, self.message
        )
    }
}

/// Outcome of one broadcast.
///
/// Callers that only care about the out-parameters can ignore it; the bus
/// itself has no failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub operation: &'static str,
    /// Handlers whose method ran to completion.
    pub delivered: usize,
    /// Slots passed over because the handler disconnected or was dropped
    /// after the snapshot was taken.
    pub skipped: usize,
    pub faults: Vec<HandlerFault>,
}

impl DispatchReport {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            delivered: 0,
            skipped: 0,
            faults: Vec::new(),
        }
    }

    /// True when no handler faulted.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    /// Number of handlers that were invoked, faulted or not.
    pub fn invoked(&self) -> usize {
        self.delivered + self.faults.len()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime dispatch options.

use std::time::Duration;

use scenemeta_config::model::BusConfig;

/// Dispatch behavior for an [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusOptions {
    /// Catch a panicking handler, record it, and keep dispatching to the
    /// remaining handlers. When false the panic is logged and resumed.
    pub isolate_faults: bool,
    /// Handler calls taking longer than this are logged at `warn`.
    pub slow_handler_warn: Option<Duration>,
    /// Maximum number of pending queued broadcasts.
    pub max_queued_events: usize,
}

impl Default for BusOptions {
    fn default() -> Self {
        Self::from(&BusConfig::default())
    }
}

impl From<&BusConfig> for BusOptions {
    fn from(config: &BusConfig) -> Self {
        Self {
            isolate_faults: config.isolate_faults,
            slow_handler_warn: match config.slow_handler_warn_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            max_queued_events: config.max_queued_events,
        }
    }
}

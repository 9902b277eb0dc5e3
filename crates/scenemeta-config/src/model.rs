// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Scenemeta configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenemetaConfig {
    /// Event bus dispatch settings.
    #[serde(default)]
    pub bus: BusConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Event bus dispatch configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusConfig {
    /// Keep dispatching to the remaining handlers when one panics.
    #[serde(default = "default_isolate_faults")]
    pub isolate_faults: bool,

    /// Log handler calls slower than this many milliseconds. 0 disables.
    #[serde(default = "default_slow_handler_warn_ms")]
    pub slow_handler_warn_ms: u64,

    /// Upper bound on pending queued broadcasts.
    #[serde(default = "default_max_queued_events")]
    pub max_queued_events: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            isolate_faults: default_isolate_faults(),
            slow_handler_warn_ms: default_slow_handler_warn_ms(),
            max_queued_events: default_max_queued_events(),
        }
    }
}

fn default_isolate_faults() -> bool {
    true
}

fn default_slow_handler_warn_ms() -> u64 {
    50
}

fn default_max_queued_events() -> usize {
    1024
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogConfig {
    /// The level as a filter directive: trimmed and lowercased.
    pub fn normalized_level(&self) -> String {
        self.level.trim().to_ascii_lowercase()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

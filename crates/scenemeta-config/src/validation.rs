// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::{suggest_key, ConfigError};
use crate::model::ScenemetaConfig;

/// Log levels accepted in `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem rather than failing on the first one.
pub fn validate_config(config: &ScenemetaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bus.max_queued_events == 0 {
        errors.push(ConfigError::Validation {
            message: "bus.max_queued_events must be at least 1".to_string(),
        });
    }

    let level = config.log.normalized_level();
    if !LOG_LEVELS.contains(&level.as_str()) {
        let message = match suggest_key(&level, LOG_LEVELS) {
            Some(s) => format!(
                "log.level `{}` is not a valid level, did you mean `{s}`?",
                config.log.level
            ),
            None => format!(
                "log.level `{}` is not a valid level (expected one of: {})",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        };
        errors.push(ConfigError::Validation { message });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

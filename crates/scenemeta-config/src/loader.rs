// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy (`./scenemeta.toml` over
//! `~/.config/scenemeta/scenemeta.toml` over `/etc/scenemeta/scenemeta.toml`)
//! with environment variable overrides via the `SCENEMETA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ScenemetaConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/scenemeta/scenemeta.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "scenemeta.toml";

/// The per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scenemeta/scenemeta.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/scenemeta/scenemeta.toml`
/// 3. `~/.config/scenemeta/scenemeta.toml`
/// 4. `./scenemeta.toml`
/// 5. `SCENEMETA_*` environment variables
pub fn load_config() -> Result<ScenemetaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ScenemetaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScenemetaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ScenemetaConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading config file");
    Figment::new()
        .merge(Serialized::defaults(ScenemetaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchical loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ScenemetaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `SCENEMETA_BUS_MAX_QUEUED_EVENTS`
/// must map to `bus.max_queued_events`, not `bus.max.queued.events`.
fn env_provider() -> Env {
    Env::prefixed("SCENEMETA_").map(|key| {
        key.as_str()
            .replacen("bus_", "bus.", 1)
            .replacen("log_", "log.", 1)
            .into()
    })
}

// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Scenemeta workspace.
//!
//! The bus itself never fails on connect or broadcast. These variants cover
//! the surfaces around it: configuration, scene loading and the bounded
//! event queue.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across Scenemeta crates.
#[derive(Debug, Error)]
pub enum SceneMetaError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A scene description could not be read or parsed.
    #[error("failed to load scene from {}: {source}", path.display())]
    SceneLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The queued-event buffer is at capacity.
    #[error("event queue is full ({capacity} pending events)")]
    QueueFull { capacity: usize },

    /// A manifest object was referenced by name but does not exist.
    #[error("no manifest object named `{name}`")]
    UnknownObject { name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

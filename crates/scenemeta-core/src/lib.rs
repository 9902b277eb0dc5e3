// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for the Scenemeta manifest metadata bus.
//!
//! This crate holds the error type and the value types that travel through
//! the bus, plus the scene and manifest collaborators handlers inspect.

pub mod error;
pub mod scene;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SceneMetaError;
pub use scene::{Manifest, ManifestObject, Scene};
pub use types::{
    sort_categories, CategoryRegistration, CategoryRegistrationList, ModifiersList, SenderId,
};

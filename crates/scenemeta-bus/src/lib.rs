// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed multi-handler event bus for scene manifest metadata.
//!
//! [`EventBus`] is the generic core: an ordered registry of weakly held
//! handlers with snapshot-then-dispatch broadcasts, per-handler fault
//! isolation and a bounded queue of deferred broadcasts.
//! [`ManifestMetaInfoBus`] is the typed facade for
//! [`ManifestMetaInfoHandler`]s.
//!
//! ```
//! use std::sync::Arc;
//!
//! use scenemeta_bus::{ManifestMetaInfoBus, ManifestMetaInfoHandler};
//! use scenemeta_core::{CategoryRegistration, CategoryRegistrationList, Scene};
//! use uuid::Uuid;
//!
//! struct Meshes;
//!
//! impl ManifestMetaInfoHandler for Meshes {
//!     fn get_category_assignments(&self, categories: &mut CategoryRegistrationList, _: &Scene) {
//!         categories.push(CategoryRegistration::new("Meshes", Uuid::nil()));
//!     }
//! }
//!
//! let bus = ManifestMetaInfoBus::new();
//! let handler = Arc::new(Meshes);
//! let _connection = bus.connect_scoped(&handler);
//!
//! let mut categories = Vec::new();
//! bus.get_category_assignments(&mut categories, &Scene::new("level", "level.toml"));
//! assert_eq!(categories.len(), 1);
//! ```

pub mod connection;
pub mod global;
pub mod manifest_meta;
pub mod options;
pub mod registry;
pub mod report;

pub use connection::Connection;
pub use manifest_meta::{ManifestMetaInfoBus, ManifestMetaInfoConnection, ManifestMetaInfoHandler};
pub use options::BusOptions;
pub use registry::{EventBus, HandlerId};
pub use report::{DispatchReport, HandlerFault};

// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scene description parsing from TOML.
//!
//! A scene description lists mesh and actor groups:
//!
//! ```toml
//! name = "harbor"
//!
//! [[mesh_group]]
//! name = "docks"
//! meshes = ["pier", "crates"]
//!
//! [[mesh_group.rules]]
//! type = "origin"
//! translation = [0.0, 0.0, 2.5]
//!
//! [[actor_group]]
//! root_node = "crane_rig"
//! ```
//!
//! Every group is passed through `initialize_object` on the bus before it is
//! added to the manifest, so groups without a name get one from the
//! connected behaviors.

use std::path::Path;
use std::sync::Arc;

use scenemeta_bus::ManifestMetaInfoBus;
use scenemeta_core::{ManifestObject, Scene, SceneMetaError};
use serde::Deserialize;
use tracing::debug;

use crate::objects::{ActorGroup, MeshGroup};

/// Top-level structure of a scene description file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mesh_group: Vec<MeshGroup>,
    #[serde(default)]
    pub actor_group: Vec<ActorGroup>,
}

impl SceneDescription {
    /// Builds a scene, initializing each group through `bus` before adding
    /// it, then announces the finished manifest with a whole-manifest update.
    pub fn into_scene(self, source_path: &Path, bus: &ManifestMetaInfoBus) -> Scene {
        let name = self.name.unwrap_or_else(|| {
            source_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene".to_string())
        });
        let mut scene = Scene::new(name, source_path);

        for mut group in self.mesh_group {
            bus.initialize_object(&scene, &mut group);
            scene.manifest_mut().add_entry(Arc::new(group));
        }
        for mut group in self.actor_group {
            bus.initialize_object(&scene, &mut group);
            scene.manifest_mut().add_entry(Arc::new(group));
        }

        debug!(
            scene = scene.name(),
            entries = scene.manifest().len(),
            "scene built"
        );
        bus.object_updated(&scene, None, None);
        scene
    }
}

/// Parses a scene description from a TOML string.
pub fn parse_scene(
    toml_content: &str,
    source_path: &Path,
    bus: &ManifestMetaInfoBus,
) -> Result<Scene, SceneMetaError> {
    let description: SceneDescription =
        toml::from_str(toml_content).map_err(|e| SceneMetaError::SceneLoad {
            path: source_path.to_path_buf(),
            source: Box::new(e),
        })?;
    Ok(description.into_scene(source_path, bus))
}

/// Loads and parses a scene description from a file path.
pub fn load_scene(path: &Path, bus: &ManifestMetaInfoBus) -> Result<Scene, SceneMetaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SceneMetaError::SceneLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    parse_scene(&content, path, bus)
}

/// Name of a built-in group entry, if `entry` is one.
pub fn entry_name(entry: &dyn ManifestObject) -> Option<&str> {
    if let Some(group) = entry.downcast_ref::<MeshGroup>() {
        return Some(group.name.as_str());
    }
    entry
        .downcast_ref::<ActorGroup>()
        .map(|group| group.name.as_str())
}

/// Looks up a group entry by name.
pub fn find_entry<'a>(
    scene: &'a Scene,
    name: &str,
) -> Result<&'a Arc<dyn ManifestObject>, SceneMetaError> {
    scene
        .manifest()
        .iter()
        .find(|&entry| entry_name(&**entry) == Some(name))
        .ok_or_else(|| SceneMetaError::UnknownObject {
            name: name.to_string(),
        })
}

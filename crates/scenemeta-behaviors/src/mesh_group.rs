// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mesh group behavior.
//!
//! Registers the "Meshes" category, supplies the mesh group icon, offers
//! origin and comment rules, names new mesh groups and keeps a list of
//! naming problems up to date as the manifest changes.

use std::collections::HashMap;

use parking_lot::Mutex;
use scenemeta_bus::{DispatchReport, ManifestMetaInfoBus, ManifestMetaInfoHandler};
use scenemeta_core::{
    CategoryRegistration, CategoryRegistrationList, ManifestObject, ModifiersList, Scene,
    SenderId,
};
use tracing::{debug, warn};

use crate::objects::{
    unique_name, MeshGroup, COMMENT_RULE_TYPE, MESH_GROUP_TYPE, ORIGIN_RULE_TYPE,
};

pub const MESH_GROUP_CATEGORY: &str = "Meshes";
pub const MESH_GROUP_ICON: &str = "icons/scene/mesh_group.svg";
const DEFAULT_NAME_PREFIX: &str = "Mesh Group";

/// A problem with a mesh group's name found during revalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameIssue {
    /// The group at this manifest index has no name.
    Empty { index: usize },
    /// More than one mesh group uses this name.
    Duplicate { name: String, count: usize },
}

/// Manifest metadata handler for [`MeshGroup`] entries.
pub struct MeshGroupBehavior {
    sender: SenderId,
    issues: Mutex<Vec<NameIssue>>,
}

impl Default for MeshGroupBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshGroupBehavior {
    pub fn new() -> Self {
        Self {
            sender: SenderId::next(),
            issues: Mutex::new(Vec::new()),
        }
    }

    /// Identity this behavior uses when it reports its own changes.
    pub fn sender_id(&self) -> SenderId {
        self.sender
    }

    /// Naming problems found by the most recent revalidation.
    pub fn name_issues(&self) -> Vec<NameIssue> {
        self.issues.lock().clone()
    }

    /// Broadcasts a change this behavior made. Its own handler skips it.
    pub fn notify_changed(
        &self,
        bus: &ManifestMetaInfoBus,
        scene: &Scene,
        target: Option<&dyn ManifestObject>,
    ) -> DispatchReport {
        bus.object_updated(scene, target, Some(self.sender))
    }

    /// Rechecks every mesh group name in `scene`.
    pub fn revalidate(&self, scene: &Scene) -> Vec<NameIssue> {
        let mut issues = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for (index, entry) in scene.manifest().iter().enumerate() {
            let Some(group) = entry.downcast_ref::<MeshGroup>() else {
                continue;
            };
            if group.name.trim().is_empty() {
                issues.push(NameIssue::Empty { index });
                continue;
            }
            let count = counts.entry(group.name.as_str()).or_insert(0);
            if *count == 0 {
                order.push(group.name.as_str());
            }
            *count += 1;
        }

        for name in order {
            let count = counts[name];
            if count > 1 {
                issues.push(NameIssue::Duplicate {
                    name: name.to_string(),
                    count,
                });
            }
        }

        for issue in &issues {
            warn!(scene = scene.name(), ?issue, "mesh group name issue");
        }
        *self.issues.lock() = issues.clone();
        issues
    }
}

impl ManifestMetaInfoHandler for MeshGroupBehavior {
    fn handler_name(&self) -> &str {
        "mesh_group"
    }

    fn get_category_assignments(&self, categories: &mut CategoryRegistrationList, _scene: &Scene) {
        categories.push(CategoryRegistration::new(MESH_GROUP_CATEGORY, MESH_GROUP_TYPE));
    }

    fn get_icon_path(&self, icon_path: &mut String, target: &dyn ManifestObject) {
        if target.is::<MeshGroup>() {
            *icon_path = MESH_GROUP_ICON.to_string();
        }
    }

    fn get_available_modifiers(
        &self,
        modifiers: &mut ModifiersList,
        _scene: &Scene,
        target: &dyn ManifestObject,
    ) {
        let Some(group) = target.downcast_ref::<MeshGroup>() else {
            return;
        };
        // Origin is single-instance, comments are not.
        if !group.has_rule(ORIGIN_RULE_TYPE) {
            modifiers.push(ORIGIN_RULE_TYPE);
        }
        modifiers.push(COMMENT_RULE_TYPE);
    }

    fn initialize_object(&self, scene: &Scene, target: &mut dyn ManifestObject) {
        let Some(group) = target.downcast_mut::<MeshGroup>() else {
            return;
        };
        if !group.name.is_empty() {
            return;
        }
        let taken = scene
            .manifest()
            .entries_of::<MeshGroup>()
            .map(|g| g.name.as_str());
        group.name = unique_name(DEFAULT_NAME_PREFIX, taken);
        debug!(scene = scene.name(), name = %group.name, "initialized mesh group");
    }

    fn object_updated(
        &self,
        scene: &Scene,
        target: Option<&dyn ManifestObject>,
        sender: Option<SenderId>,
    ) {
        if sender == Some(self.sender) {
            debug!(scene = scene.name(), "ignoring own update");
            return;
        }
        match target {
            Some(object) if !object.is::<MeshGroup>() => {}
            _ => {
                self.revalidate(scene);
            }
        }
    }
}

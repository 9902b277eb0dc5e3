// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Actor group behavior.

use scenemeta_bus::ManifestMetaInfoHandler;
use scenemeta_core::{
    CategoryRegistration, CategoryRegistrationList, ManifestObject, ModifiersList, Scene,
};

use crate::objects::{unique_name, ActorGroup, ACTOR_GROUP_TYPE, MATERIAL_RULE_TYPE};

pub const ACTOR_GROUP_CATEGORY: &str = "Actors";
pub const ACTOR_GROUP_ICON: &str = "icons/scene/actor_group.svg";
/// Actors are listed ahead of categories that keep the default order.
pub const ACTOR_GROUP_ORDER: i32 = 100;
const DEFAULT_NAME_PREFIX: &str = "Actor Group";

/// Manifest metadata handler for [`ActorGroup`] entries.
#[derive(Debug, Default)]
pub struct ActorGroupBehavior;

impl ManifestMetaInfoHandler for ActorGroupBehavior {
    fn handler_name(&self) -> &str {
        "actor_group"
    }

    fn get_category_assignments(&self, categories: &mut CategoryRegistrationList, _scene: &Scene) {
        categories.push(CategoryRegistration::with_order(
            ACTOR_GROUP_CATEGORY,
            ACTOR_GROUP_TYPE,
            ACTOR_GROUP_ORDER,
        ));
    }

    fn get_icon_path(&self, icon_path: &mut String, target: &dyn ManifestObject) {
        if target.is::<ActorGroup>() {
            *icon_path = ACTOR_GROUP_ICON.to_string();
        }
    }

    fn get_available_modifiers(
        &self,
        modifiers: &mut ModifiersList,
        _scene: &Scene,
        target: &dyn ManifestObject,
    ) {
        if let Some(group) = target.downcast_ref::<ActorGroup>() {
            if !group.has_rule(MATERIAL_RULE_TYPE) {
                modifiers.push(MATERIAL_RULE_TYPE);
            }
        }
    }

    fn initialize_object(&self, scene: &Scene, target: &mut dyn ManifestObject) {
        if let Some(group) = target.downcast_mut::<ActorGroup>() {
            if group.name.is_empty() {
                let taken = scene
                    .manifest()
                    .entries_of::<ActorGroup>()
                    .map(|g| g.name.as_str());
                group.name = unique_name(DEFAULT_NAME_PREFIX, taken);
            }
        }
    }
}

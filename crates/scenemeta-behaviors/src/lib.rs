// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in manifest metadata behaviors.
//!
//! These handlers are always available without any host plugin. They answer
//! every `ManifestMetaInfoBus` operation for mesh and actor groups.

pub mod actor_group;
pub mod description;
pub mod mesh_group;
pub mod objects;

pub use actor_group::ActorGroupBehavior;
pub use description::{entry_name, find_entry, load_scene, parse_scene, SceneDescription};
pub use mesh_group::{MeshGroupBehavior, NameIssue};
pub use objects::{
    rule_type_name, ActorGroup, CommentRule, MaterialRule, MeshGroup, OriginRule, Rule,
};

use std::sync::Arc;

use scenemeta_bus::{ManifestMetaInfoBus, ManifestMetaInfoConnection};

/// The built-in behaviors and their bus connections.
///
/// The bus holds handlers weakly; this keeps them alive. Dropping it
/// disconnects every built-in behavior.
pub struct BuiltinBehaviors {
    pub mesh_group: Arc<MeshGroupBehavior>,
    pub actor_group: Arc<ActorGroupBehavior>,
    connections: Vec<ManifestMetaInfoConnection>,
}

impl BuiltinBehaviors {
    pub fn connections(&self) -> &[ManifestMetaInfoConnection] {
        &self.connections
    }
}

/// Connects all built-in behaviors to `bus`, mesh groups first.
pub fn connect_builtin_behaviors(bus: &ManifestMetaInfoBus) -> BuiltinBehaviors {
    let mesh_group = Arc::new(MeshGroupBehavior::new());
    let actor_group = Arc::new(ActorGroupBehavior);
    let connections = vec![
        bus.connect_scoped(&mesh_group),
        bus.connect_scoped(&actor_group),
    ];
    BuiltinBehaviors {
        mesh_group,
        actor_group,
        connections,
    }
}

// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest object and scene fixtures.

use std::any::Any;
use std::sync::Arc;

use scenemeta_core::{ManifestObject, Scene};
use uuid::Uuid;

/// Type id of [`TestGroup`].
pub const TEST_GROUP_TYPE: Uuid = Uuid::from_u128(0x5c3e_0001_0000_4000_8000_0000_0000_0001);

/// Type id of [`TestRule`].
pub const TEST_RULE_TYPE: Uuid = Uuid::from_u128(0x5c3e_0001_0000_4000_8000_0000_0000_0002);

/// A group-like manifest object carrying a list of applied modifier ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestGroup {
    pub name: String,
    pub modifiers: Vec<Uuid>,
}

impl TestGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn has_modifier(&self, modifier: Uuid) -> bool {
        self.modifiers.contains(&modifier)
    }
}

impl ManifestObject for TestGroup {
    fn type_uuid(&self) -> Uuid {
        TEST_GROUP_TYPE
    }

    fn type_name(&self) -> &'static str {
        "TestGroup"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A leaf manifest object with no state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestRule;

impl ManifestObject for TestRule {
    fn type_uuid(&self) -> Uuid {
        TEST_RULE_TYPE
    }

    fn type_name(&self) -> &'static str {
        "TestRule"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A scene whose manifest holds the given groups, in order.
pub fn scene_with_groups<I, S>(names: I) -> Scene
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut scene = Scene::new("test-scene", "test-scene.toml");
    for name in names {
        scene
            .manifest_mut()
            .add_entry(Arc::new(TestGroup::named(name)));
    }
    scene
}

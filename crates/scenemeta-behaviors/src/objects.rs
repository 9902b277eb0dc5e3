// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest objects handled by the built-in behaviors.
//!
//! Groups are manifest entries. Rules are modifiers attached to a group and
//! are identified on the bus by their type id.

use std::any::Any;

use scenemeta_core::ManifestObject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MESH_GROUP_TYPE: Uuid = Uuid::from_u128(0x07f0_5e1c_6a1d_4b4e_9d63_1c2a_0000_0001);
pub const ACTOR_GROUP_TYPE: Uuid = Uuid::from_u128(0x07f0_5e1c_6a1d_4b4e_9d63_1c2a_0000_0002);
pub const ORIGIN_RULE_TYPE: Uuid = Uuid::from_u128(0x07f0_5e1c_6a1d_4b4e_9d63_1c2a_0000_0101);
pub const MATERIAL_RULE_TYPE: Uuid = Uuid::from_u128(0x07f0_5e1c_6a1d_4b4e_9d63_1c2a_0000_0102);
pub const COMMENT_RULE_TYPE: Uuid = Uuid::from_u128(0x07f0_5e1c_6a1d_4b4e_9d63_1c2a_0000_0103);

/// Moves the group's origin before export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRule {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for OriginRule {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> f32 {
    1.0
}

/// Overrides the material assigned to every node in the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRule {
    pub material: String,
}

/// Free-form note; a group may carry any number of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRule {
    pub text: String,
}

/// A rule attached to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Origin(OriginRule),
    Material(MaterialRule),
    Comment(CommentRule),
}

impl Rule {
    pub fn type_uuid(&self) -> Uuid {
        match self {
            Rule::Origin(_) => ORIGIN_RULE_TYPE,
            Rule::Material(_) => MATERIAL_RULE_TYPE,
            Rule::Comment(_) => COMMENT_RULE_TYPE,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Rule::Origin(_) => "OriginRule",
            Rule::Material(_) => "MaterialRule",
            Rule::Comment(_) => "CommentRule",
        }
    }
}

/// Human-readable name of a rule type id, for display.
pub fn rule_type_name(type_id: Uuid) -> Option<&'static str> {
    const NAMES: [(Uuid, &str); 3] = [
        (ORIGIN_RULE_TYPE, "OriginRule"),
        (MATERIAL_RULE_TYPE, "MaterialRule"),
        (COMMENT_RULE_TYPE, "CommentRule"),
    ];
    NAMES
        .iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, name)| *name)
}

fn count_rules(rules: &[Rule], type_id: Uuid) -> usize {
    rules.iter().filter(|r| r.type_uuid() == type_id).count()
}

/// A set of meshes exported together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meshes: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl MeshGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_rule(&self, type_id: Uuid) -> bool {
        count_rules(&self.rules, type_id) > 0
    }

    pub fn rule_count(&self, type_id: Uuid) -> usize {
        count_rules(&self.rules, type_id)
    }
}

impl ManifestObject for MeshGroup {
    fn type_uuid(&self) -> Uuid {
        MESH_GROUP_TYPE
    }

    fn type_name(&self) -> &'static str {
        "MeshGroup"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A set of animated actors exported together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root_node: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl ActorGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_rule(&self, type_id: Uuid) -> bool {
        count_rules(&self.rules, type_id) > 0
    }
}

impl ManifestObject for ActorGroup {
    fn type_uuid(&self) -> Uuid {
        ACTOR_GROUP_TYPE
    }

    fn type_name(&self) -> &'static str {
        "ActorGroup"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// First `"{prefix} {n}"`, counting from 1, that is not in `taken`.
pub(crate) fn unique_name<'a>(prefix: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.into_iter().collect();
    let mut n = 1usize;
    loop {
        let candidate = format!("{prefix} {n}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_type_ids_are_distinct() {
        let rules = [
            Rule::Origin(OriginRule::default()),
            Rule::Material(MaterialRule::default()),
            Rule::Comment(CommentRule::default()),
        ];
        let ids: Vec<Uuid> = rules.iter().map(Rule::type_uuid).collect();
        assert_eq!(ids, [ORIGIN_RULE_TYPE, MATERIAL_RULE_TYPE, COMMENT_RULE_TYPE]);
        for rule in &rules {
            assert_eq!(rule_type_name(rule.type_uuid()), Some(rule.type_name()));
        }
        assert_eq!(rule_type_name(MESH_GROUP_TYPE), None);
    }

    #[test]
    fn rule_counts() {
        let group = MeshGroup {
            name: "g".into(),
            meshes: vec![],
            rules: vec![
                Rule::Comment(CommentRule { text: "a".into() }),
                Rule::Comment(CommentRule { text: "b".into() }),
            ],
        };
        assert!(group.has_rule(COMMENT_RULE_TYPE));
        assert!(!group.has_rule(ORIGIN_RULE_TYPE));
        assert_eq!(group.rule_count(COMMENT_RULE_TYPE), 2);
    }

    #[test]
    fn unique_name_skips_taken() {
        assert_eq!(unique_name("Mesh Group", []), "Mesh Group 1");
        assert_eq!(
            unique_name("Mesh Group", ["Mesh Group 1", "Mesh Group 3"]),
            "Mesh Group 2"
        );
    }

    #[test]
    fn rules_deserialize_from_tagged_tables() {
        let group: MeshGroup = toml::from_str(
            r#"
name = "props"
meshes = ["crate", "barrel"]

[[rules]]
type = "origin"
translation = [0.0, 1.0, 0.0]

[[rules]]
type = "comment"
text = "export at 1:1"
"#,
        )
        .unwrap();
        assert_eq!(group.rules.len(), 2);
        assert_eq!(
            group.rules[0],
            Rule::Origin(OriginRule {
                translation: [0.0, 1.0, 0.0],
                scale: 1.0,
            })
        );
    }
}

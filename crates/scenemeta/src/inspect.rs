// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scenemeta inspect` command implementation.
//!
//! Loads a scene description, connects the built-in behaviors and asks the
//! bus for categories, icons and available modifiers. If `--json` is
//! passed, outputs structured JSON for scripting.

use std::fmt::Write as _;
use std::path::Path;

use scenemeta_behaviors::{
    connect_builtin_behaviors, entry_name, find_entry, load_scene, rule_type_name,
};
use scenemeta_bus::{DispatchReport, ManifestMetaInfoBus};
use scenemeta_core::{sort_categories, ManifestObject, Scene, SceneMetaError};
use serde::Serialize;
use tracing::{info, warn};

/// Structured output of `scenemeta inspect`.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub scene: String,
    pub source: String,
    pub categories: Vec<CategoryOut>,
    pub objects: Vec<ObjectOut>,
    /// Handler faults seen while answering, one line each.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryOut {
    pub name: String,
    pub group_type: String,
    pub preferred_order: i32,
}

#[derive(Debug, Serialize)]
pub struct ObjectOut {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub icon: Option<String>,
    pub modifiers: Vec<String>,
}

/// Run the `scenemeta inspect` command.
pub fn run_inspect(
    bus: &ManifestMetaInfoBus,
    path: &Path,
    object: Option<&str>,
    json: bool,
) -> Result<(), SceneMetaError> {
    let _builtins = connect_builtin_behaviors(bus);
    let scene = load_scene(path, bus)?;
    info!(
        scene = scene.name(),
        entries = scene.manifest().len(),
        "scene loaded"
    );

    let report = build_report(bus, &scene, object)?;
    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| SceneMetaError::Internal(format!("failed to serialize report: {e}")))?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Queries the bus for everything `inspect` shows.
///
/// With `object` set, only that entry is described.
pub fn build_report(
    bus: &ManifestMetaInfoBus,
    scene: &Scene,
    object: Option<&str>,
) -> Result<InspectReport, SceneMetaError> {
    let mut faults = Vec::new();

    let mut categories = Vec::new();
    collect_faults(&mut faults, bus.get_category_assignments(&mut categories, scene));
    sort_categories(&mut categories);

    let targets: Vec<&dyn ManifestObject> = match object {
        Some(name) => vec![&**find_entry(scene, name)?],
        None => scene.manifest().iter().map(|entry| &**entry).collect(),
    };

    let mut objects = Vec::with_capacity(targets.len());
    for target in targets {
        let mut icon = String::new();
        collect_faults(&mut faults, bus.get_icon_path(&mut icon, target));

        let mut modifiers = Vec::new();
        collect_faults(
            &mut faults,
            bus.get_available_modifiers(&mut modifiers, scene, target),
        );

        objects.push(ObjectOut {
            name: entry_name(target).unwrap_or_default().to_string(),
            type_name: target.type_name().to_string(),
            icon: (!icon.is_empty()).then_some(icon),
            modifiers: modifiers
                .iter()
                .map(|id| {
                    rule_type_name(*id)
                        .map(str::to_string)
                        .unwrap_or_else(|| id.to_string())
                })
                .collect(),
        });
    }

    Ok(InspectReport {
        scene: scene.name().to_string(),
        source: scene.source_path().display().to_string(),
        categories: categories
            .into_iter()
            .map(|c| CategoryOut {
                name: c.category_name,
                group_type: c.category_target_group_id.to_string(),
                preferred_order: c.preferred_order,
            })
            .collect(),
        objects,
        faults,
    })
}

fn collect_faults(faults: &mut Vec<String>, report: DispatchReport) {
    for fault in report.faults {
        warn!(%fault, "handler fault during inspect");
        faults.push(fault.to_string());
    }
}

/// Human-readable rendering of an [`InspectReport`].
pub fn render_text(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scene: {} ({})", report.scene, report.source);

    let _ = writeln!(out, "\nCategories:");
    if report.categories.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for category in &report.categories {
        let _ = writeln!(out, "  {}", category.name);
    }

    let _ = writeln!(out, "\nObjects:");
    if report.objects.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for object in &report.objects {
        let _ = writeln!(out, "  {} [{}]", object.name, object.type_name);
        if let Some(icon) = &object.icon {
            let _ = writeln!(out, "    icon:      {icon}");
        }
        let modifiers = if object.modifiers.is_empty() {
            "(none)".to_string()
        } else {
            object.modifiers.join(", ")
        };
        let _ = writeln!(out, "    modifiers: {modifiers}");
    }

    if !report.faults.is_empty() {
        let _ = writeln!(out, "\nHandler faults:");
        for fault in &report.faults {
            let _ = writeln!(out, "  {fault}");
        }
    }
    out
}

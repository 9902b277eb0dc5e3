// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording handler for asserting on bus delivery.
//!
//! `RecordingHandler` implements every `ManifestMetaInfoHandler` method,
//! records each call, and contributes pre-configured outputs. Several
//! handlers can share one [`CallLog`] to assert on cross-handler ordering.

use std::sync::Arc;

use parking_lot::Mutex;
use scenemeta_bus::ManifestMetaInfoHandler;
use scenemeta_core::{
    CategoryRegistration, CategoryRegistrationList, ManifestObject, ModifiersList, Scene,
    SenderId,
};
use uuid::Uuid;

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CategoryAssignments { scene: String },
    IconPath { target_type: Uuid },
    AvailableModifiers { target_type: Uuid },
    InitializeObject { target_type: Uuid },
    ObjectUpdated {
        target_type: Option<Uuid>,
        sender: Option<SenderId>,
    },
}

/// Calls recorded across one or more handlers, tagged with the handler name.
pub type CallLog = Arc<Mutex<Vec<(String, RecordedCall)>>>;

/// Creates an empty shared call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A handler that records every call and contributes configured outputs.
pub struct RecordingHandler {
    name: String,
    log: CallLog,
    categories: Vec<CategoryRegistration>,
    icon: Option<(Uuid, String)>,
    modifiers: Vec<Uuid>,
}

impl RecordingHandler {
    /// Creates a handler with its own private call log.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_log(name, call_log())
    }

    /// Creates a handler that records into a shared log.
    pub fn with_log(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            categories: Vec::new(),
            icon: None,
            modifiers: Vec::new(),
        }
    }

    /// Appends `category` on every `get_category_assignments` call.
    pub fn contributing_category(mut self, category: CategoryRegistration) -> Self {
        self.categories.push(category);
        self
    }

    /// Writes `path` as the icon for targets of type `target_type`.
    pub fn with_icon(mut self, target_type: Uuid, path: impl Into<String>) -> Self {
        self.icon = Some((target_type, path.into()));
        self
    }

    /// Appends `modifier` on every `get_available_modifiers` call.
    pub fn offering_modifier(mut self, modifier: Uuid) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Calls recorded by this handler, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log
            .lock()
            .iter()
            .filter(|(name, _)| *name == self.name)
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|(name, _)| *name == self.name)
            .count()
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    fn record(&self, call: RecordedCall) {
        self.log.lock().push((self.name.clone(), call));
    }
}

impl ManifestMetaInfoHandler for RecordingHandler {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn get_category_assignments(&self, categories: &mut CategoryRegistrationList, scene: &Scene) {
        self.record(RecordedCall::CategoryAssignments {
            scene: scene.name().to_string(),
        });
        categories.extend(self.categories.iter().cloned());
    }

    fn get_icon_path(&self, icon_path: &mut String, target: &dyn ManifestObject) {
        self.record(RecordedCall::IconPath {
            target_type: target.type_uuid(),
        });
        if let Some((target_type, path)) = &self.icon {
            if *target_type == target.type_uuid() {
                *icon_path = path.clone();
            }
        }
    }

    fn get_available_modifiers(
        &self,
        modifiers: &mut ModifiersList,
        _scene: &Scene,
        target: &dyn ManifestObject,
    ) {
        self.record(RecordedCall::AvailableModifiers {
            target_type: target.type_uuid(),
        });
        modifiers.extend(self.modifiers.iter().copied());
    }

    fn initialize_object(&self, _scene: &Scene, target: &mut dyn ManifestObject) {
        self.record(RecordedCall::InitializeObject {
            target_type: target.type_uuid(),
        });
    }

    fn object_updated(
        &self,
        _scene: &Scene,
        target: Option<&dyn ManifestObject>,
        sender: Option<SenderId>,
    ) {
        self.record(RecordedCall::ObjectUpdated {
            target_type: target.map(|t| t.type_uuid()),
            sender,
        });
    }
}

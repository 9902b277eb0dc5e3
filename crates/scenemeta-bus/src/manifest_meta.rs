// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The manifest metadata bus.
//!
//! Tools that edit a scene manifest ask this bus which categories exist,
//! which icon to draw for an entry, which modifiers an entry accepts, and
//! tell it when entries are created or change. Every connected
//! [`ManifestMetaInfoHandler`] sees every call, in registration order.

use std::sync::Arc;

use scenemeta_core::{
    CategoryRegistrationList, ManifestObject, ModifiersList, Scene, SceneMetaError, SenderId,
};

use crate::connection::Connection;
use crate::options::BusOptions;
use crate::registry::{EventBus, HandlerId};
use crate::report::DispatchReport;

/// Capability set for manifest metadata handlers.
///
/// Every method has an empty default body, so a handler overrides only the
/// operations it cares about. Methods take `&self`: handlers are shared and
/// may be called from several threads at once.
pub trait ManifestMetaInfoHandler: Send + Sync {
    /// Name used in logs and fault reports.
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Append the categories this handler contributes.
    ///
    /// Never remove or reorder entries added by other handlers.
    fn get_category_assignments(
        &self,
        _categories: &mut CategoryRegistrationList,
        _scene: &Scene,
    ) {
    }

    /// Overwrite `icon_path` if `target`'s type is recognized, otherwise
    /// leave it alone. The last handler to write wins.
    fn get_icon_path(&self, _icon_path: &mut String, _target: &dyn ManifestObject) {}

    /// Append the modifier type ids `target` currently accepts.
    ///
    /// Evaluate against the target's state on every call: a single-instance
    /// modifier the target already carries must not be offered again.
    fn get_available_modifiers(
        &self,
        _modifiers: &mut ModifiersList,
        _scene: &Scene,
        _target: &dyn ManifestObject,
    ) {
    }

    /// Populate defaults on a newly created manifest object. Siblings may be
    /// read through `scene` but not changed.
    fn initialize_object(&self, _scene: &Scene, _target: &mut dyn ManifestObject) {}

    /// An existing object changed. `target` is `None` when the manifest as a
    /// whole changed, for example when an entry was deleted.
    ///
    /// The call reaches every handler, the sender included; a handler that
    /// sends updates should compare `sender` with its own identity and skip
    /// its own changes.
    fn object_updated(
        &self,
        _scene: &Scene,
        _target: Option<&dyn ManifestObject>,
        _sender: Option<SenderId>,
    ) {
    }
}

/// Connection guard for a [`ManifestMetaInfoHandler`].
pub type ManifestMetaInfoConnection = Connection<dyn ManifestMetaInfoHandler>;

/// Typed facade over an [`EventBus`] of [`ManifestMetaInfoHandler`]s.
///
/// Cheap to clone; clones share one handler registry. Pass it explicitly to
/// the publishers and handlers that need it, or use
/// [`ManifestMetaInfoBus::global`] for a process-wide instance.
#[derive(Clone, Debug)]
pub struct ManifestMetaInfoBus {
    bus: EventBus<dyn ManifestMetaInfoHandler>,
}

impl Default for ManifestMetaInfoBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestMetaInfoBus {
    pub fn new() -> Self {
        Self::with_options(BusOptions::default())
    }

    pub fn with_options(options: BusOptions) -> Self {
        Self {
            bus: EventBus::new("manifest_meta_info", options),
        }
    }

    /// The underlying generic bus.
    pub fn event_bus(&self) -> &EventBus<dyn ManifestMetaInfoHandler> {
        &self.bus
    }

    /// Connects a handler. The bus holds it weakly; keep the `Arc` alive.
    pub fn connect<T>(&self, handler: &Arc<T>) -> HandlerId
    where
        T: ManifestMetaInfoHandler + 'static,
    {
        let erased: Arc<dyn ManifestMetaInfoHandler> = handler.clone();
        self.connect_dyn(&erased)
    }

    pub fn connect_dyn(&self, handler: &Arc<dyn ManifestMetaInfoHandler>) -> HandlerId {
        self.bus.connect(handler, handler.handler_name().to_string())
    }

    /// Connects a handler for the lifetime of the returned guard.
    pub fn connect_scoped<T>(&self, handler: &Arc<T>) -> ManifestMetaInfoConnection
    where
        T: ManifestMetaInfoHandler + 'static,
    {
        let erased: Arc<dyn ManifestMetaInfoHandler> = handler.clone();
        self.bus
            .connect_scoped(&erased, erased.handler_name().to_string())
    }

    pub fn disconnect(&self, id: HandlerId) -> bool {
        self.bus.disconnect(id)
    }

    pub fn disconnect_all(&self) -> usize {
        self.bus.disconnect_all()
    }

    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.bus.is_connected(id)
    }

    pub fn handler_count(&self) -> usize {
        self.bus.handler_count()
    }

    pub fn has_handlers(&self) -> bool {
        self.bus.has_handlers()
    }

    /// Collects every handler's categories. A handler that panics
    /// contributes nothing.
    pub fn get_category_assignments(
        &self,
        categories: &mut CategoryRegistrationList,
        scene: &Scene,
    ) -> DispatchReport {
        self.bus.broadcast_with_rollback(
            "get_category_assignments",
            categories,
            |list| list.len(),
            |list, len| list.truncate(len),
            |h, list| h.get_category_assignments(list, scene),
        )
    }

    /// Asks every handler for `target`'s icon. A handler that panics leaves
    /// `icon_path` as it found it.
    pub fn get_icon_path(
        &self,
        icon_path: &mut String,
        target: &dyn ManifestObject,
    ) -> DispatchReport {
        self.bus.broadcast_with_rollback(
            "get_icon_path",
            icon_path,
            |path| path.clone(),
            |path, saved| *path = saved,
            |h, path| h.get_icon_path(path, target),
        )
    }

    pub fn get_available_modifiers(
        &self,
        modifiers: &mut ModifiersList,
        scene: &Scene,
        target: &dyn ManifestObject,
    ) -> DispatchReport {
        self.bus.broadcast_with_rollback(
            "get_available_modifiers",
            modifiers,
            |list| list.len(),
            |list, len| list.truncate(len),
            |h, list| h.get_available_modifiers(list, scene, target),
        )
    }

    /// Lets every handler populate defaults on `target`. Changes a handler
    /// made before panicking are kept.
    pub fn initialize_object(
        &self,
        scene: &Scene,
        target: &mut dyn ManifestObject,
    ) -> DispatchReport {
        self.bus.broadcast("initialize_object", |h| {
            h.initialize_object(scene, &mut *target)
        })
    }

    pub fn object_updated(
        &self,
        scene: &Scene,
        target: Option<&dyn ManifestObject>,
        sender: Option<SenderId>,
    ) -> DispatchReport {
        self.bus
            .broadcast("object_updated", |h| h.object_updated(scene, target, sender))
    }

    /// Queues an `object_updated` notification for
    /// [`execute_queued_events`](Self::execute_queued_events).
    pub fn queue_object_updated(
        &self,
        scene: Arc<Scene>,
        target: Option<Arc<dyn ManifestObject>>,
        sender: Option<SenderId>,
    ) -> Result<(), SceneMetaError> {
        self.bus.queue_broadcast("object_updated", move |h| {
            h.object_updated(&scene, target.as_deref(), sender)
        })
    }

    pub fn execute_queued_events(&self) -> Vec<DispatchReport> {
        self.bus.execute_queued_events()
    }

    pub fn queued_len(&self) -> usize {
        self.bus.queued_len()
    }
}

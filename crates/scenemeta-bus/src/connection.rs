// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped handler connections.

use std::fmt;

use crate::registry::{EventBus, HandlerId};

/// Keeps a handler connected for as long as it is alive.
///
/// Dropping the `Connection` disconnects the handler, with the same
/// guarantees as [`EventBus::disconnect`].
#[must_use = "dropping a Connection disconnects its handler"]
pub struct Connection<H: ?Sized + Send + Sync + 'static> {
    bus: EventBus<H>,
    id: HandlerId,
    active: bool,
}

impl<H: ?Sized + Send + Sync + 'static> Connection<H> {
    pub(crate) fn new(bus: EventBus<H>, id: HandlerId) -> Self {
        Self {
            bus,
            id,
            active: true,
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn is_connected(&self) -> bool {
        self.active && self.bus.is_connected(self.id)
    }

    /// Disconnects now. Returns false if the handler was already gone.
    pub fn disconnect(mut self) -> bool {
        self.active = false;
        self.bus.disconnect(self.id)
    }

    /// Releases the guard without disconnecting; the handler stays connected
    /// until [`EventBus::disconnect`] is called with the returned id.
    pub fn detach(mut self) -> HandlerId {
        self.active = false;
        self.id
    }
}

impl<H: ?Sized + Send + Sync + 'static> Drop for Connection<H> {
    fn drop(&mut self) {
        if self.active {
            self.bus.disconnect(self.id);
        }
    }
}

impl<H: ?Sized + Send + Sync + 'static> fmt::Debug for Connection<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("bus", &self.bus.name())
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

impl<H: ?Sized + Send + Sync + 'static> EventBus<H> {
    /// Connects `handler` and returns a guard that disconnects it on drop.
    pub fn connect_scoped(
        &self,
        handler: &std::sync::Arc<H>,
        label: impl Into<String>,
    ) -> Connection<H> {
        let id = self.connect(handler, label);
        Connection::new(self.clone(), id)
    }
}

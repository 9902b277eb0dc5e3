// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide default bus, for callers that cannot thread a bus through.

use std::sync::LazyLock;

use crate::manifest_meta::ManifestMetaInfoBus;

static GLOBAL_BUS: LazyLock<ManifestMetaInfoBus> = LazyLock::new(ManifestMetaInfoBus::new);

impl ManifestMetaInfoBus {
    /// The process-wide bus, created with default options on first use.
    ///
    /// Prefer constructing a bus and passing it explicitly; this exists for
    /// code that expects a single ambient bus.
    pub fn global() -> &'static ManifestMetaInfoBus {
        &GLOBAL_BUS
    }
}

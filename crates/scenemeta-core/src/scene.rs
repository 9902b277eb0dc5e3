// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scene and manifest collaborator types.
//!
//! The bus never looks inside these. They exist so handlers have something
//! concrete to downcast and inspect: a [`Scene`] carries a [`Manifest`], an
//! ordered list of polymorphic [`ManifestObject`] entries.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

/// A polymorphic manifest entry, identified by its runtime type id.
pub trait ManifestObject: Any + Send + Sync + fmt::Debug {
    /// Stable type id of the concrete manifest object type.
    fn type_uuid(&self) -> Uuid;

    /// Human-readable type name, used in logs.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn ManifestObject + '_ {
    /// Returns true if the concrete type is `T`.
    pub fn is<T: ManifestObject>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: ManifestObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: ManifestObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Ordered collection of manifest entries belonging to a scene.
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    entries: Vec<Arc<dyn ManifestObject>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its index.
    pub fn add_entry(&mut self, entry: Arc<dyn ManifestObject>) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Removes the entry at `index`, shifting later entries down.
    pub fn remove_entry(&mut self, index: usize) -> Option<Arc<dyn ManifestObject>> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Replaces the entry at `index`, returning the previous value.
    pub fn replace_entry(
        &mut self,
        index: usize,
        entry: Arc<dyn ManifestObject>,
    ) -> Option<Arc<dyn ManifestObject>> {
        self.entries
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, entry))
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn ManifestObject>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ManifestObject>> {
        self.entries.iter()
    }

    /// Iterates the entries whose concrete type is `T`.
    pub fn entries_of<T: ManifestObject>(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|e| e.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A loaded scene: a name, the file it came from, and its manifest.
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    source_path: PathBuf,
    manifest: Manifest,
}

impl Scene {
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            manifest: Manifest::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }
}

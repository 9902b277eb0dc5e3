// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types exchanged through the manifest metadata bus.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named bucket into which manifest object types are filed, with a sort
/// key for UI ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRegistration {
    /// Display name of the category.
    pub category_name: String,
    /// Type id of the manifest object created for this category.
    pub category_target_group_id: Uuid,
    /// Lower values sort first. Defaults to `i32::MAX` ("sort last").
    #[serde(default = "default_preferred_order")]
    pub preferred_order: i32,
}

impl CategoryRegistration {
    /// Creates a registration with the default `preferred_order` of `i32::MAX`.
    pub fn new(category_name: impl Into<String>, category_target_group_id: Uuid) -> Self {
        Self::with_order(
            category_name,
            category_target_group_id,
            default_preferred_order(),
        )
    }

    /// Creates a registration with an explicit sort key.
    pub fn with_order(
        category_name: impl Into<String>,
        category_target_group_id: Uuid,
        preferred_order: i32,
    ) -> Self {
        Self {
            category_name: category_name.into(),
            category_target_group_id,
            preferred_order,
        }
    }
}

fn default_preferred_order() -> i32 {
    i32::MAX
}

/// Ordered list of category registrations, in handler invocation order.
pub type CategoryRegistrationList = Vec<CategoryRegistration>;

/// Ordered list of modifier type ids, in handler invocation order.
pub type ModifiersList = Vec<Uuid>;

/// Sorts registrations for display: by `preferred_order`, then by name.
///
/// The sort is stable, so registrations with equal keys keep the order the
/// handlers produced them in.
pub fn sort_categories(categories: &mut [CategoryRegistration]) {
    categories.sort_by(|a, b| {
        a.preferred_order
            .cmp(&b.preferred_order)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
}

/// Opaque identity of the originator of an `object_updated` notification.
///
/// Handlers compare the sender against their own identity to skip reacting
/// to changes they made themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenderId {
    /// A process-unique token handed out by [`SenderId::next`].
    Token(u64),
    /// The address of a live value, see [`SenderId::of`].
    Address(usize),
}

impl SenderId {
    /// Allocates a fresh process-unique sender token.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SenderId::Token(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Derives an identity from the address of `value`.
    ///
    /// Only meaningful while `value` stays alive and does not move.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        SenderId::Address(value as *const T as *const () as usize)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree model: locations, node flags, and visibility.

use core::sync::atomic::{AtomicU32, Ordering};

/// Opaque handle to a node in one [`Model`](crate::Model).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the node it points at is removed.
/// It consists of the owning model's instance id, a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `Location` that pointed to that slot is now stale
///   and resolves to [`TreeError::NotFound`](crate::TreeError::NotFound).
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `Location`.
/// - Re-submitting an element with [`Model::set_children`](crate::Model::set_children) keeps the
///   node record, so its `Location` stays live.
///
/// ### Ownership
///
/// Every model draws its instance id from a process-wide counter, and
/// [`Model::reset`](crate::Model::reset) draws a new one.
/// Passing a `Location` to a model that did not mint it (or that has been reset since)
/// fails with [`TreeError::InvalidLocation`](crate::TreeError::InvalidLocation).
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    model: u32,
    slot: u32,
    generation: u32,
}

impl Location {
    pub(crate) const fn new(model: u32, slot: u32, generation: u32) -> Self {
        Self {
            model,
            slot,
            generation,
        }
    }

    pub(crate) const fn model(self) -> u32 {
        self.model
    }

    pub(crate) const fn slot(self) -> u32 {
        self.slot
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

/// Allocate a model instance id. Ids are never handed out twice within a process.
pub(crate) fn next_model_id() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub(crate) struct NodeFlags: u8 {
        /// Node can be collapsed and expanded.
        const COLLAPSIBLE = 0b0000_0001;
        /// Node hides its children from the render order.
        const COLLAPSED   = 0b0000_0010;
        /// Node passed the filter (resolved, including `Recurse`).
        const VISIBLE     = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Outcome of filtering a single element.
///
/// Also handed to the filter as the *parent* visibility: the raw outcome the
/// parent's own filter call produced, or [`Visibility::Visible`] for top-level elements.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Visibility {
    /// The element and its whole subtree are left out of the render order.
    Hidden,
    /// The element is rendered (subject to ancestor collapse state).
    #[default]
    Visible,
    /// The element is rendered iff at least one descendant resolves to visible.
    Recurse,
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }
}

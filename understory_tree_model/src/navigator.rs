// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepping through the render order.

use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::error::{Result, TreeError};
use crate::filter::TreeFilter;
use crate::model::Model;
use crate::node::{Arena, ROOT, TreeNode};
use crate::types::Location;

impl<T, D> Arena<T, D> {
    fn first_visible(&self, slots: &[u32]) -> Option<u32> {
        slots.iter().copied().find(|&s| self.node(s).is_visible())
    }

    fn last_visible(&self, slots: &[u32]) -> Option<u32> {
        slots.iter().rev().copied().find(|&s| self.node(s).is_visible())
    }

    /// First row, if any.
    pub(crate) fn first_row(&self) -> Option<u32> {
        self.first_visible(&self.node(ROOT).children)
    }

    /// Last row, if any.
    pub(crate) fn last_row(&self) -> Option<u32> {
        let last = self.last_rendered_descendant(ROOT);
        (last != ROOT).then_some(last)
    }

    /// Deepest last row inside `slot`'s subtree, or `slot` itself when it shows no children.
    fn last_rendered_descendant(&self, mut slot: u32) -> u32 {
        loop {
            let node = self.node(slot);
            if !node.reveals_children() {
                return slot;
            }
            match self.last_visible(&node.children) {
                Some(child) => slot = child,
                None => return slot,
            }
        }
    }

    /// Row after the rendered `slot`.
    pub(crate) fn next_rendered(&self, slot: u32) -> Option<u32> {
        let node = self.node(slot);
        if node.reveals_children() {
            if let Some(child) = self.first_visible(&node.children) {
                return Some(child);
            }
        }
        let mut cur = slot;
        while let Some(parent) = self.node(cur).parent {
            let siblings = &self.node(parent).children;
            let at = siblings.iter().position(|&s| s == cur)?;
            if let Some(next) = self.first_visible(&siblings[at + 1..]) {
                return Some(next);
            }
            cur = parent;
        }
        None
    }

    /// Row before the rendered `slot`.
    pub(crate) fn previous_rendered(&self, slot: u32) -> Option<u32> {
        let parent = self.node(slot).parent?;
        let siblings = &self.node(parent).children;
        let at = siblings.iter().position(|&s| s == slot)?;
        match self.last_visible(&siblings[..at]) {
            Some(sibling) => Some(self.last_rendered_descendant(sibling)),
            None => (parent != ROOT).then_some(parent),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cursor {
    BeforeStart,
    At(u32),
    AfterEnd,
}

/// A cursor over the render order.
///
/// Collapsed and filtered-out subtrees are skipped. Every move returns the element it
/// lands on, or `None` once it runs off either end; further moves in the same direction
/// keep returning `None`, and moving back re-enters the sequence at that end.
///
/// ```
/// use understory_tree_model::{Model, TreeElement};
///
/// let mut model = Model::new();
/// model
///     .set_children(
///         model.root(),
///         [TreeElement::new("a").with_children([TreeElement::new("b")])],
///     )
///     .unwrap();
///
/// let mut nav = model.navigator();
/// assert_eq!(nav.next(), Some(&"a"));
/// assert_eq!(nav.next(), Some(&"b"));
/// assert_eq!(nav.parent(), Some(&"a"));
/// assert_eq!(nav.previous(), None);
/// assert_eq!(nav.previous(), None);
/// assert_eq!(nav.last(), Some(&"b"));
/// ```
pub struct Navigator<'a, T, D> {
    arena: &'a Arena<T, D>,
    model: u32,
    cursor: Cursor,
}

impl<'a, T, D> Navigator<'a, T, D> {
    fn settle(&mut self, next: Cursor) -> Option<&'a T> {
        self.cursor = next;
        self.current()
    }

    /// Element under the cursor.
    pub fn current(&self) -> Option<&'a T> {
        match self.cursor {
            Cursor::At(slot) => self.arena.node(slot).element.as_ref(),
            Cursor::BeforeStart | Cursor::AfterEnd => None,
        }
    }

    /// Location of the node under the cursor.
    pub fn current_location(&self) -> Option<Location> {
        self.current_node().map(|n| n.location())
    }

    /// View of the node under the cursor.
    pub fn current_node(&self) -> Option<TreeNode<'a, T, D>> {
        match self.cursor {
            Cursor::At(slot) => Some(TreeNode::new(self.arena, self.model, slot)),
            Cursor::BeforeStart | Cursor::AfterEnd => None,
        }
    }

    /// Step to the next row.
    #[allow(
        clippy::should_implement_trait,
        reason = "A navigator moves both ways; it is not an iterator."
    )]
    pub fn next(&mut self) -> Option<&'a T> {
        let next = match self.cursor {
            Cursor::BeforeStart => self.arena.first_row(),
            Cursor::At(slot) => self.arena.next_rendered(slot),
            Cursor::AfterEnd => None,
        };
        self.settle(next.map_or(Cursor::AfterEnd, Cursor::At))
    }

    /// Step to the previous row.
    pub fn previous(&mut self) -> Option<&'a T> {
        let previous = match self.cursor {
            Cursor::BeforeStart => None,
            Cursor::At(slot) => self.arena.previous_rendered(slot),
            Cursor::AfterEnd => self.arena.last_row(),
        };
        self.settle(previous.map_or(Cursor::BeforeStart, Cursor::At))
    }

    /// Jump to the first row.
    pub fn first(&mut self) -> Option<&'a T> {
        let first = self.arena.first_row();
        self.settle(first.map_or(Cursor::BeforeStart, Cursor::At))
    }

    /// Jump to the last row.
    pub fn last(&mut self) -> Option<&'a T> {
        let last = self.arena.last_row();
        self.settle(last.map_or(Cursor::AfterEnd, Cursor::At))
    }

    /// Jump to the parent row. Top-level rows have none; the cursor then stays put.
    pub fn parent(&mut self) -> Option<&'a T> {
        let Cursor::At(slot) = self.cursor else {
            return None;
        };
        match self.arena.node(slot).parent {
            Some(parent) if parent != ROOT => self.settle(Cursor::At(parent)),
            _ => None,
        }
    }
}

impl<T, D> Clone for Navigator<'_, T, D> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            model: self.model,
            cursor: self.cursor,
        }
    }
}

impl<T, D> fmt::Debug for Navigator<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Iterator over the rows of a model, in render order.
///
/// Returned by [`Model::rendered`].
pub struct Rendered<'a, T, D> {
    arena: &'a Arena<T, D>,
    model: u32,
    next: Option<u32>,
    remaining: usize,
}

impl<'a, T, D> Iterator for Rendered<'a, T, D> {
    type Item = TreeNode<'a, T, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        self.next = self.arena.next_rendered(slot);
        self.remaining = self.remaining.saturating_sub(1);
        Some(TreeNode::new(self.arena, self.model, slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, D> ExactSizeIterator for Rendered<'_, T, D> {}

impl<T, D> FusedIterator for Rendered<'_, T, D> {}

impl<T, D> fmt::Debug for Rendered<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rendered")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<T, F> Model<T, F>
where
    T: Clone + Eq + Hash,
    F: TreeFilter<T>,
{
    /// A navigator positioned before the first row.
    pub fn navigator(&self) -> Navigator<'_, T, F::Data> {
        Navigator {
            arena: self.arena(),
            model: self.root().model(),
            cursor: Cursor::BeforeStart,
        }
    }

    /// A navigator positioned on `location`, which must be rendered.
    pub fn navigator_at(&self, location: Location) -> Result<Navigator<'_, T, F::Data>> {
        let index = self.list_index(location)?;
        if index.is_none() {
            return Err(TreeError::NotRendered(location));
        }
        Ok(Navigator {
            arena: self.arena(),
            model: location.model(),
            cursor: Cursor::At(location.slot()),
        })
    }

    /// Iterate the rows in render order.
    pub fn rendered(&self) -> Rendered<'_, T, F::Data> {
        let arena = self.arena();
        Rendered {
            arena,
            model: self.root().model(),
            next: arena.first_row(),
            remaining: self.rendered_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FilterResult, Model, ModelOptions, TreeElement, TreeError, Visibility};
    use alloc::vec::Vec;

    type Str = &'static str;

    /// a -> [b, c(collapsed) -> [d]], hidden -> [e], f
    fn model() -> Model<Str, impl FnMut(&Str, Visibility) -> FilterResult<()>> {
        let filter = |e: &Str, _: Visibility| FilterResult::<()>::from(*e != "hidden");
        let mut model = Model::with_options(ModelOptions::new().with_filter(filter));
        model
            .set_children(
                model.root(),
                [
                    TreeElement::new("a").with_children([
                        TreeElement::new("b"),
                        TreeElement::new("c")
                            .collapsed(true)
                            .with_children([TreeElement::new("d")]),
                    ]),
                    TreeElement::new("hidden").with_children([TreeElement::new("e")]),
                    TreeElement::new("f"),
                ],
            )
            .unwrap();
        model
    }

    #[test]
    fn next_and_previous_skip_collapsed_and_filtered_subtrees() {
        let model = model();
        let mut nav = model.navigator();
        let mut forward = Vec::new();
        while let Some(e) = nav.next() {
            forward.push(*e);
        }
        assert_eq!(forward, ["a", "b", "c", "f"]);
        assert_eq!(nav.next(), None, "stays past the end");

        let mut backward = Vec::new();
        while let Some(e) = nav.previous() {
            backward.push(*e);
        }
        assert_eq!(backward, ["f", "c", "b", "a"]);
    }

    #[test]
    fn previous_at_start_keeps_returning_none() {
        let model = model();
        let mut nav = model.navigator();
        assert_eq!(nav.first(), Some(&"a"));
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.current(), None);
        assert_eq!(nav.next(), Some(&"a"));
    }

    #[test]
    fn parent_jumps_to_rendered_ancestor() {
        let model = model();
        let c = model.location_of(&"c").unwrap();
        let mut nav = model.navigator_at(c).unwrap();
        assert_eq!(nav.current(), Some(&"c"));
        assert_eq!(nav.parent(), Some(&"a"));
        assert_eq!(nav.parent(), None, "top-level rows have no parent row");
        assert_eq!(nav.current(), Some(&"a"));
        assert_eq!(nav.current_location(), model.location_of(&"a"));
        assert_eq!(nav.last(), Some(&"f"));
    }

    #[test]
    fn navigator_at_rejects_unrendered_nodes() {
        let model = model();
        for e in ["d", "e", "hidden"] {
            let location = model.location_of(&e).unwrap();
            assert!(matches!(
                model.navigator_at(location),
                Err(TreeError::NotRendered(_))
            ));
        }
    }

    #[test]
    fn rendered_matches_row_indices() {
        let model = model();
        let rows: Vec<_> = model.rendered().collect();
        assert_eq!(rows.len(), model.rendered_len());
        assert_eq!(model.rendered().len(), 4);
        for (i, node) in rows.iter().enumerate() {
            assert_eq!(model.list_index(node.location()).unwrap(), Some(i));
            assert_eq!(model.node_at(i).unwrap().location(), node.location());
        }
    }

    #[test]
    fn empty_model_has_no_rows() {
        let model: Model<Str> = Model::new();
        let mut nav = model.navigator();
        assert_eq!(nav.first(), None);
        assert_eq!(nav.last(), None);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.previous(), None);
        assert_eq!(model.rendered().count(), 0);
    }
}

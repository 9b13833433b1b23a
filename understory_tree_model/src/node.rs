// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: the slot arena, cached render counts, and read-only node views.

use alloc::vec::Vec;
use core::fmt;

use crate::filter::FilterSource;
use crate::types::{Location, NodeFlags, Visibility};

/// Slot of the root node. The root is created with the arena and never freed.
pub(crate) const ROOT: u32 = 0;

#[derive(Clone, Debug)]
pub(crate) struct Node<T, D> {
    pub(crate) generation: u32,
    /// `None` only for the root.
    pub(crate) element: Option<T>,
    pub(crate) parent: Option<u32>,
    pub(crate) children: Vec<u32>,
    /// Root is `0`, top-level nodes are `1`.
    pub(crate) depth: u32,
    pub(crate) flags: NodeFlags,
    /// Raw filter outcome.
    pub(crate) visibility: Visibility,
    pub(crate) filter_data: Option<D>,
    pub(crate) render_node_count: usize,
}

impl<T, D> Node<T, D> {
    pub(crate) fn new(element: Option<T>, parent: Option<u32>, depth: u32) -> Self {
        Self {
            generation: 0,
            element,
            parent,
            children: Vec::new(),
            depth,
            flags: NodeFlags::default(),
            visibility: Visibility::Visible,
            filter_data: None,
            render_node_count: 0,
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub(crate) fn is_collapsed(&self) -> bool {
        self.flags.contains(NodeFlags::COLLAPSED)
    }

    pub(crate) fn is_collapsible(&self) -> bool {
        self.flags.contains(NodeFlags::COLLAPSIBLE)
    }

    /// Whether this node's children can take rows: the root always, others when
    /// visible and expanded.
    pub(crate) fn reveals_children(&self) -> bool {
        self.parent.is_none() || (self.is_visible() && !self.is_collapsed())
    }
}

/// Slot storage for nodes, with generations that persist across frees.
pub(crate) struct Arena<T, D> {
    slots: Vec<Option<Node<T, D>>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl<T, D> Arena<T, D> {
    /// Create an arena holding only the root.
    pub(crate) fn new() -> Self {
        let mut arena = Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        };
        let root = arena.insert(Node::new(None, None, 0));
        debug_assert_eq!(root, ROOT, "root must occupy the first slot");
        arena
    }

    /// Store `node` in a free slot, stamping its generation.
    pub(crate) fn insert(&mut self, mut node: Node<T, D>) -> u32 {
        if let Some(slot) = self.free_list.pop() {
            let idx = slot as usize;
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.slots[idx] = Some(node);
            slot
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Locations use 32-bit slot indices by design."
            )]
            let slot = self.slots.len() as u32;
            node.generation = 1;
            self.slots.push(Some(node));
            self.generations.push(1);
            slot
        }
    }

    /// Free a slot, returning its node.
    pub(crate) fn remove(&mut self, slot: u32) -> Option<Node<T, D>> {
        let node = self.slots.get_mut(slot as usize)?.take()?;
        self.free_list.push(slot);
        Some(node)
    }

    pub(crate) fn get(&self, slot: u32) -> Option<&Node<T, D>> {
        self.slots.get(slot as usize)?.as_ref()
    }

    /// Access a live node; panics if `slot` is free.
    pub(crate) fn node(&self, slot: u32) -> &Node<T, D> {
        self.slots[slot as usize].as_ref().expect("dangling slot")
    }

    /// Access a live node mutably; panics if `slot` is free.
    pub(crate) fn node_mut(&mut self, slot: u32) -> &mut Node<T, D> {
        self.slots[slot as usize].as_mut().expect("dangling slot")
    }

    /// Total slots, live or free. Slot keys are always below this.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live nodes, excluding the root.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free_list.len() - 1
    }

    pub(crate) fn free_slots(&self) -> usize {
        self.free_list.len()
    }

    /// Count of rows this node contributes, from its flags and its children's counts.
    pub(crate) fn own_count(&self, slot: u32) -> usize {
        let node = self.node(slot);
        let children = || {
            node.children
                .iter()
                .map(|&c| self.node(c).render_node_count)
                .sum::<usize>()
        };
        if node.parent.is_none() {
            children()
        } else if !node.is_visible() {
            0
        } else if node.is_collapsed() {
            1
        } else {
            1 + children()
        }
    }

    /// Recompute counts for the subtree in post-order, recording slots whose count changed.
    pub(crate) fn recount_subtree(&mut self, slot: u32, changed: &mut Vec<u32>) {
        let children = self.node(slot).children.clone();
        for child in children {
            self.recount_subtree(child, changed);
        }
        self.recount(slot, changed);
    }

    /// Recompute the count of `slot` and every ancestor up to the root.
    pub(crate) fn recount_path(&mut self, slot: u32, changed: &mut Vec<u32>) {
        let mut cur = Some(slot);
        while let Some(s) = cur {
            self.recount(s, changed);
            cur = self.node(s).parent;
        }
    }

    fn recount(&mut self, slot: u32, changed: &mut Vec<u32>) {
        let count = self.own_count(slot);
        let node = self.node_mut(slot);
        if node.render_node_count != count {
            node.render_node_count = count;
            changed.push(slot);
        }
    }

    /// Number of rows before `slot`'s position, or `None` when an ancestor hides it.
    pub(crate) fn slot_index(&self, slot: u32) -> Option<usize> {
        let mut index = 0;
        let mut cur = slot;
        while let Some(parent) = self.node(cur).parent {
            let p = self.node(parent);
            if !p.reveals_children() {
                return None;
            }
            if p.parent.is_some() {
                index += 1;
            }
            index += p
                .children
                .iter()
                .take_while(|&&c| c != cur)
                .map(|&c| self.node(c).render_node_count)
                .sum::<usize>();
            cur = parent;
        }
        Some(index)
    }

    /// Row of `slot` in the render order, if it is rendered.
    pub(crate) fn list_index(&self, slot: u32) -> Option<usize> {
        let node = self.node(slot);
        if node.parent.is_none() || !node.is_visible() {
            return None;
        }
        self.slot_index(slot)
    }

    /// Slot rendered at row `index`; the caller checks `index` against the root count.
    pub(crate) fn slot_at(&self, mut index: usize) -> Option<u32> {
        let mut cur = ROOT;
        loop {
            let node = self.node(cur);
            if node.parent.is_some() {
                if index == 0 {
                    return Some(cur);
                }
                index -= 1;
            }
            let mut next = None;
            for &child in &node.children {
                let count = self.node(child).render_node_count;
                if index < count {
                    next = Some(child);
                    break;
                }
                index -= count;
            }
            cur = next?;
        }
    }

    /// Append the rows of `slot`'s subtree in render order. The root contributes
    /// only its descendants.
    pub(crate) fn collect_rows(&self, slot: u32, out: &mut Vec<u32>) {
        let node = self.node(slot);
        if node.parent.is_some() {
            if !node.is_visible() {
                return;
            }
            out.push(slot);
        }
        if node.reveals_children() {
            for &child in &node.children {
                self.collect_rows(child, out);
            }
        }
    }

    /// Gather every slot in `slot`'s subtree, including itself, in pre-order.
    pub(crate) fn collect_subtree(&self, slot: u32, out: &mut Vec<u32>) {
        out.push(slot);
        for &child in &self.node(slot).children {
            self.collect_subtree(child, out);
        }
    }
}

impl<T, D> FilterSource<T> for Arena<T, D> {
    fn element(&self, key: u32) -> &T {
        self.node(key)
            .element
            .as_ref()
            .expect("the root is never filtered")
    }

    fn children(&self, key: u32) -> &[u32] {
        &self.node(key).children
    }
}

impl<T, D> fmt::Debug for Arena<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("nodes_total", &self.slots.len())
            .field("nodes_alive", &(self.live() + 1))
            .field("free_slots", &self.free_slots())
            .finish_non_exhaustive()
    }
}

/// Read-only view of a node, as consumed by a renderer.
///
/// Views borrow the model, so the model cannot change while one is alive.
pub struct TreeNode<'a, T, D> {
    arena: &'a Arena<T, D>,
    model: u32,
    slot: u32,
}

impl<'a, T, D> TreeNode<'a, T, D> {
    pub(crate) fn new(arena: &'a Arena<T, D>, model: u32, slot: u32) -> Self {
        Self { arena, model, slot }
    }

    fn node(&self) -> &'a Node<T, D> {
        self.arena.node(self.slot)
    }

    /// Handle of this node.
    pub fn location(&self) -> Location {
        Location::new(self.model, self.slot, self.node().generation)
    }

    /// The user payload; `None` for the root.
    pub fn element(&self) -> Option<&'a T> {
        self.node().element.as_ref()
    }

    /// Whether this is the root.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let parent = self.node().parent?;
        Some(Self::new(self.arena, self.model, parent))
    }

    /// Children in sibling order, whatever their visibility.
    pub fn children(&self) -> impl ExactSizeIterator<Item = TreeNode<'a, T, D>> + use<'a, T, D> {
        let (arena, model) = (self.arena, self.model);
        self.node()
            .children
            .iter()
            .map(move |&slot| TreeNode::new(arena, model, slot))
    }

    /// Depth below the root: top-level nodes are `0`.
    ///
    /// The root is never rendered and has no depth of its own. It reports `0` as well;
    /// use [`is_root`](Self::is_root) to tell it apart from a top-level node.
    pub fn depth(&self) -> usize {
        self.node().depth.saturating_sub(1) as usize
    }

    /// Whether the node can be collapsed.
    pub fn collapsible(&self) -> bool {
        self.node().is_collapsible()
    }

    /// Whether the node hides its children.
    pub fn collapsed(&self) -> bool {
        self.node().is_collapsed()
    }

    /// Whether the node passed the filter (with `Recurse` resolved).
    pub fn visible(&self) -> bool {
        self.node().is_visible()
    }

    /// The raw outcome of the last filter call.
    pub fn visibility(&self) -> Visibility {
        self.node().visibility
    }

    /// Data the filter attached to this node.
    pub fn filter_data(&self) -> Option<&'a D> {
        self.node().filter_data.as_ref()
    }

    /// Rows this node's subtree contributes to the render order.
    pub fn render_node_count(&self) -> usize {
        self.node().render_node_count
    }

    /// Number of children that passed the filter.
    pub fn visible_child_count(&self) -> usize {
        self.node()
            .children
            .iter()
            .filter(|&&c| self.arena.node(c).is_visible())
            .count()
    }
}

impl<T, D> Clone for TreeNode<'_, T, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, D> Copy for TreeNode<'_, T, D> {}

impl<T: fmt::Debug, D: fmt::Debug> fmt::Debug for TreeNode<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("TreeNode")
            .field("location", &self.location())
            .field("element", &node.element)
            .field("depth", &self.depth())
            .field("flags", &node.flags)
            .field("visibility", &node.visibility)
            .field("filter_data", &node.filter_data)
            .field("render_node_count", &node.render_node_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// root -> [a -> [b], c]
    fn sample() -> (Arena<char, ()>, [u32; 3]) {
        let mut arena = Arena::new();
        let a = arena.insert(Node::new(Some('a'), Some(ROOT), 1));
        let b = arena.insert(Node::new(Some('b'), Some(a), 2));
        let c = arena.insert(Node::new(Some('c'), Some(ROOT), 1));
        arena.node_mut(ROOT).children = vec![a, c];
        arena.node_mut(a).children = vec![b];
        let mut changed = Vec::new();
        arena.recount_subtree(ROOT, &mut changed);
        (arena, [a, b, c])
    }

    #[test]
    fn counts_and_indices_follow_flags() {
        let (mut arena, [a, b, c]) = sample();
        assert_eq!(arena.node(ROOT).render_node_count, 3);
        assert_eq!(arena.list_index(b), Some(1));
        assert_eq!(arena.list_index(c), Some(2));
        assert_eq!(arena.slot_at(1), Some(b));

        arena.node_mut(a).flags.insert(NodeFlags::COLLAPSED);
        let mut changed = Vec::new();
        arena.recount_path(a, &mut changed);
        assert_eq!(changed, vec![a, ROOT], "bottom-up, root last");
        assert_eq!(arena.list_index(b), None);
        assert_eq!(arena.list_index(c), Some(1));
        assert_eq!(arena.slot_at(2), None);
    }

    #[test]
    fn root_and_top_level_nodes_report_depth_zero() {
        let (arena, [a, b, _]) = sample();
        let root = TreeNode::new(&arena, 0, ROOT);
        let a = TreeNode::new(&arena, 0, a);
        assert!(root.is_root());
        assert!(!a.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(a.depth(), 0);
        assert_eq!(TreeNode::new(&arena, 0, b).depth(), 1);
    }

    #[test]
    fn freed_slots_are_reused_with_a_new_generation() {
        let (mut arena, [_, b, _]) = sample();
        let old = arena.node(b).generation;
        assert!(arena.remove(b).is_some());
        assert!(arena.get(b).is_none());
        let again = arena.insert(Node::new(Some('d'), Some(ROOT), 1));
        assert_eq!(again, b);
        assert!(arena.node(again).generation > old);
        assert_eq!(arena.free_slots(), 0);
    }
}

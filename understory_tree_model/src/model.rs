// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core model implementation: structure, collapse state, filtering, and list indexing.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::ops::Range;
use std::collections::{HashMap, HashSet};

use crate::element::TreeElement;
use crate::error::{Result, TreeError};
use crate::event::{ListSplice, Listeners, SubscriptionId, TreeEvent};
use crate::filter::{self, AcceptAll, FilterSource, Outcome, TreeFilter};
use crate::node::{Arena, Node, ROOT, TreeNode};
use crate::options::{ModelOptions, TreeSorter};
use crate::types::{Location, NodeFlags, Visibility, next_model_id};

/// A filterable, collapsible tree that maintains a flattened render order.
///
/// The model owns every node. Callers address nodes through [`Location`]s and read
/// them through [`TreeNode`] views; all changes go through the mutation methods, which
/// run to completion and then notify [subscribers](Self::subscribe).
///
/// Elements are unique within a model: they double as keys for
/// [`location_of`](Self::location_of) and for preserving node records across
/// [`set_children`](Self::set_children) calls.
pub struct Model<T, F: TreeFilter<T> = AcceptAll> {
    id: u32,
    arena: Arena<T, F::Data>,
    elements: HashMap<T, u32>,
    options: ModelOptions<T, F>,
    listeners: Listeners,
}

impl<T, F> fmt::Debug for Model<T, F>
where
    F: TreeFilter<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("arena", &self.arena)
            .field("rendered", &self.arena.node(ROOT).render_node_count)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Eq + Hash> Model<T> {
    /// Create an empty model that shows every element in insertion order.
    pub fn new() -> Self {
        Self::with_options(ModelOptions::new())
    }
}

impl<T: Clone + Eq + Hash> Default for Model<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A submitted description, flattened into keyed records before anything is applied.
struct Staged<T> {
    element: T,
    collapsible: Option<bool>,
    collapsed: Option<bool>,
    children: Vec<u32>,
}

struct Staging<T>(Vec<Staged<T>>);

impl<T> FilterSource<T> for Staging<T> {
    fn element(&self, key: u32) -> &T {
        &self.0[key as usize].element
    }

    fn children(&self, key: u32) -> &[u32] {
        &self.0[key as usize].children
    }
}

impl<T> Staging<T> {
    /// Flatten `descriptions`, draining lazy children and sorting every sibling list.
    fn push_all(
        &mut self,
        descriptions: Vec<TreeElement<T>>,
        sorter: Option<&dyn TreeSorter<T>>,
    ) -> Vec<u32> {
        let mut keys = Vec::with_capacity(descriptions.len());
        for description in descriptions {
            let TreeElement {
                element,
                children,
                collapsible,
                collapsed,
            } = description;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Locations use 32-bit slot indices by design."
            )]
            let key = self.0.len() as u32;
            self.0.push(Staged {
                element,
                collapsible,
                collapsed,
                children: Vec::new(),
            });
            let child_keys = self.push_all(children.into_iter().collect(), sorter);
            self.0[key as usize].children = child_keys;
            keys.push(key);
        }
        if let Some(sorter) = sorter {
            keys.sort_by(|&a, &b| sorter.compare(self.element(a), self.element(b)));
        }
        keys
    }
}

/// Rows of one subtree captured before a mutation, to diff against afterwards.
struct Region {
    anchor: u32,
    start: Option<usize>,
    rows: Vec<Location>,
}

impl<T, F> Model<T, F>
where
    T: Clone + Eq + Hash,
    F: TreeFilter<T>,
{
    /// Create an empty model.
    pub fn with_options(options: ModelOptions<T, F>) -> Self {
        Self {
            id: next_model_id(),
            arena: Arena::new(),
            elements: HashMap::new(),
            options,
            listeners: Listeners::default(),
        }
    }

    // --- locations ---

    /// Location of the root. The root has no element and is never rendered.
    pub fn root(&self) -> Location {
        self.location_of_slot(ROOT)
    }

    /// Returns true if `location` was minted by this model and its node still exists.
    pub fn is_alive(&self, location: Location) -> bool {
        self.resolve(location).is_ok()
    }

    /// Location of the node holding `element`.
    pub fn location_of<Q>(&self, element: &Q) -> Option<Location>
    where
        T: core::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.elements
            .get(element)
            .map(|&slot| self.location_of_slot(slot))
    }

    /// Read-only view of the node at `location`.
    pub fn node(&self, location: Location) -> Result<TreeNode<'_, T, F::Data>> {
        let slot = self.resolve(location)?;
        Ok(self.view(slot))
    }

    /// Location of the parent; `None` for the root.
    pub fn parent_location(&self, location: Location) -> Result<Option<Location>> {
        let slot = self.resolve(location)?;
        Ok(self
            .arena
            .node(slot)
            .parent
            .map(|p| self.location_of_slot(p)))
    }

    /// Element of the parent; `None` for top-level nodes and the root.
    pub fn parent_element(&self, location: Location) -> Result<Option<&T>> {
        let slot = self.resolve(location)?;
        Ok(self
            .arena
            .node(slot)
            .parent
            .and_then(|p| self.arena.node(p).element.as_ref()))
    }

    /// Element of the first child, whatever its visibility.
    pub fn first_element_child(&self, location: Location) -> Result<Option<&T>> {
        let slot = self.resolve(location)?;
        Ok(self
            .arena
            .node(slot)
            .children
            .first()
            .map(|&c| self.arena.element(c)))
    }

    /// Element reached by following last children down from `location`.
    ///
    /// The walk stops at the first node none of whose children passed the filter, which
    /// may be the node at `location` itself. Collapse state is ignored. `None` when the
    /// node has no children at all, or when the walk stops at the root.
    /// For the last *rendered* row, use [`Navigator::last`](crate::Navigator::last).
    pub fn last_element_ancestor(&self, location: Location) -> Result<Option<&T>> {
        let mut slot = self.resolve(location)?;
        if self.arena.node(slot).children.is_empty() {
            return Ok(None);
        }
        loop {
            let node = self.arena.node(slot);
            if !node.children.iter().any(|&c| self.arena.node(c).is_visible()) {
                return Ok(node.element.as_ref());
            }
            slot = node.children[node.children.len() - 1];
        }
    }

    /// Whether the node can be collapsed.
    pub fn is_collapsible(&self, location: Location) -> Result<bool> {
        let slot = self.resolve(location)?;
        Ok(self.arena.node(slot).is_collapsible())
    }

    /// Whether the node hides its children.
    pub fn is_collapsed(&self, location: Location) -> Result<bool> {
        let slot = self.resolve(location)?;
        Ok(self.arena.node(slot).is_collapsed())
    }

    // --- flattened list ---

    /// Number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.arena.live()
    }

    /// Returns true if the model holds no nodes besides the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows in the render order.
    pub fn rendered_len(&self) -> usize {
        self.arena.node(ROOT).render_node_count
    }

    /// Row of the node in the render order; `None` when it is not rendered.
    ///
    /// Walks the ancestors, summing the cached counts of preceding siblings.
    pub fn list_index(&self, location: Location) -> Result<Option<usize>> {
        let slot = self.resolve(location)?;
        Ok(self.arena.list_index(slot))
    }

    /// The node rendered at row `index`.
    pub fn node_at(&self, index: usize) -> Result<TreeNode<'_, T, F::Data>> {
        let len = self.rendered_len();
        let out_of_range = TreeError::IndexOutOfRange { index, len };
        if index >= len {
            return Err(out_of_range);
        }
        let slot = self.arena.slot_at(index).ok_or(out_of_range)?;
        Ok(self.view(slot))
    }

    // --- configuration ---

    /// The configured filter.
    pub fn filter(&self) -> &F {
        &self.options.filter
    }

    /// Mutable access to the filter, e.g. to change a query before [`refilter`](Self::refilter).
    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.options.filter
    }

    // --- events ---

    /// Register a listener; it runs synchronously after every mutation that produces events.
    pub fn subscribe(&mut self, listener: impl FnMut(&TreeEvent) + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // --- structural mutation ---

    /// Replace all children of `parent` with `children`.
    ///
    /// Node records whose element reappears anywhere in the replaced subtrees are reused:
    /// their locations stay valid, and their collapse state is kept unless the new
    /// description sets `collapsed`.
    pub fn set_children(
        &mut self,
        parent: Location,
        children: impl IntoIterator<Item = TreeElement<T>>,
    ) -> Result<()> {
        let slot = self.resolve(parent)?;
        let len = self.arena.node(slot).children.len();
        self.splice_slot(slot, 0..len, children.into_iter().collect())
    }

    /// Replace `range` of `parent`'s children with `children`.
    ///
    /// With a sorter configured, the sibling list is re-sorted afterwards, so the
    /// position only matters for insertion order among equal elements.
    pub fn splice(
        &mut self,
        parent: Location,
        range: Range<usize>,
        children: impl IntoIterator<Item = TreeElement<T>>,
    ) -> Result<()> {
        let slot = self.resolve(parent)?;
        let len = self.arena.node(slot).children.len();
        if range.start > range.end || range.end > len {
            return Err(TreeError::IndexOutOfRange {
                index: range.start.max(range.end),
                len,
            });
        }
        self.splice_slot(slot, range, children.into_iter().collect())
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, location: Location) -> Result<()> {
        let slot = self.resolve(location)?;
        let parent = self
            .arena
            .node(slot)
            .parent
            .ok_or(TreeError::InvalidLocation(location))?;
        let index = self
            .arena
            .node(parent)
            .children
            .iter()
            .position(|&c| c == slot)
            .expect("child is linked to its parent");
        self.splice_slot(parent, index..index + 1, Vec::new())
    }

    /// Drop every node. Listeners and options are kept; every location minted so far
    /// becomes invalid.
    ///
    /// When rows were shown, listeners see the new root's count drop to `0`, then one
    /// splice deleting every row.
    pub fn reset(&mut self) {
        let before = self.rendered_len();
        self.id = next_model_id();
        self.arena = Arena::new();
        self.elements.clear();
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "tree.reset", model = self.id, removed_rows = before);
        if before > 0 {
            self.emit(alloc::vec![
                TreeEvent::RenderNodeCountChanged {
                    location: self.root(),
                    render_node_count: 0,
                },
                TreeEvent::Splice(ListSplice {
                    start: 0,
                    delete_count: before,
                    inserted: Vec::new(),
                }),
            ]);
        }
    }

    /// Re-apply the sorter to the children of `location`, and to the whole subtree
    /// when `recursive`. Does nothing without a sorter.
    pub fn resort(&mut self, location: Location, recursive: bool) -> Result<()> {
        let slot = self.resolve(location)?;
        if self.options.sorter.is_none() {
            return Ok(());
        }
        let region = self.capture_region(slot);
        self.sort_subtree(slot, recursive);
        let events = self.finish_region(region).into_iter().collect();
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "tree.resort", recursive);
        self.emit(events);
        Ok(())
    }

    // --- collapse state ---

    /// Set the collapse state of a node; `None` toggles it.
    ///
    /// When `recursive`, the same state is applied to every collapsible descendant.
    /// Non-collapsible nodes are left alone. Returns whether anything changed; a
    /// change emits exactly one [`TreeEvent::CollapseStateChanged`].
    pub fn set_collapsed(
        &mut self,
        location: Location,
        collapsed: Option<bool>,
        recursive: bool,
    ) -> Result<bool> {
        let slot = self.resolve(location)?;
        if slot == ROOT {
            return Ok(false);
        }
        let collapsed = collapsed.unwrap_or(!self.arena.node(slot).is_collapsed());
        let region = self.capture_region(slot);

        let mut touched = Vec::new();
        self.apply_collapse(slot, collapsed, recursive, &mut touched);
        if !collapsed && !recursive && self.options.auto_expand_single_children {
            self.auto_expand(slot, &mut touched);
        }
        if touched.is_empty() {
            return Ok(false);
        }

        let mut changed = Vec::new();
        if recursive {
            self.arena.recount_subtree(slot, &mut changed);
            if let Some(parent) = self.arena.node(slot).parent {
                self.arena.recount_path(parent, &mut changed);
            }
        } else {
            // Touched nodes form a single downward chain at or below `slot`.
            let deepest = touched[touched.len() - 1];
            self.arena.recount_path(deepest, &mut changed);
        }

        let mut events = self.count_events(&changed);
        events.extend(self.finish_region(region));
        events.push(TreeEvent::CollapseStateChanged {
            location,
            deep: recursive,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.set_collapsed",
            collapsed,
            recursive,
            touched = touched.len(),
            rendered = self.rendered_len()
        );
        self.emit(events);
        Ok(true)
    }

    /// Expand every collapsed ancestor of `location`. Returns whether anything changed.
    pub fn expand_to(&mut self, location: Location) -> Result<bool> {
        let slot = self.resolve(location)?;
        let mut ancestors = Vec::new();
        let mut cur = self.arena.node(slot).parent;
        while let Some(parent) = cur {
            if parent != ROOT {
                ancestors.push(parent);
            }
            cur = self.arena.node(parent).parent;
        }
        let mut changed = false;
        for &ancestor in ancestors.iter().rev() {
            if self.arena.node(ancestor).is_collapsed() {
                let at = self.location_of_slot(ancestor);
                changed |= self.set_collapsed(at, Some(false), false)?;
            }
        }
        Ok(changed)
    }

    // --- filtering ---

    /// Re-run the filter over the whole tree and re-flatten.
    ///
    /// Every node is filtered from scratch, since the filter's own state may have changed.
    /// On a filter error nothing is applied and no event is emitted.
    pub fn refilter(&mut self) -> Result<()> {
        let mut outcomes: Vec<Option<Outcome<F::Data>>> =
            (0..self.arena.capacity()).map(|_| None).collect();
        filter::evaluate(
            &mut self.options.filter,
            &self.arena,
            &self.arena.node(ROOT).children,
            Visibility::Visible,
            &mut outcomes,
        )
        .map_err(TreeError::Filter)?;

        let region = self.capture_region(ROOT);
        for (slot, outcome) in (0_u32..).zip(outcomes) {
            let Some(outcome) = outcome else {
                continue;
            };
            let node = self.arena.node_mut(slot);
            node.flags.set(NodeFlags::VISIBLE, outcome.visible);
            node.visibility = outcome.visibility;
            node.filter_data = outcome.data;
        }
        let mut changed = Vec::new();
        self.arena.recount_subtree(ROOT, &mut changed);

        let mut events = self.count_events(&changed);
        events.extend(self.finish_region(region));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.refilter",
            nodes = self.len(),
            rendered = self.rendered_len(),
            count_changes = changed.len()
        );
        self.emit(events);
        Ok(())
    }

    // --- internals ---

    fn resolve(&self, location: Location) -> Result<u32> {
        if location.model() != self.id {
            return Err(TreeError::InvalidLocation(location));
        }
        match self.arena.get(location.slot()) {
            Some(node) if node.generation == location.generation() => Ok(location.slot()),
            _ => Err(TreeError::NotFound(location)),
        }
    }

    pub(crate) fn location_of_slot(&self, slot: u32) -> Location {
        Location::new(self.id, slot, self.arena.node(slot).generation)
    }

    pub(crate) fn view(&self, slot: u32) -> TreeNode<'_, T, F::Data> {
        TreeNode::new(&self.arena, self.id, slot)
    }

    pub(crate) fn arena(&self) -> &Arena<T, F::Data> {
        &self.arena
    }

    fn emit(&mut self, events: Vec<TreeEvent>) {
        if !events.is_empty() {
            self.listeners.dispatch(&events);
        }
    }

    fn count_events(&self, changed: &[u32]) -> Vec<TreeEvent> {
        changed
            .iter()
            .map(|&slot| TreeEvent::RenderNodeCountChanged {
                location: self.location_of_slot(slot),
                render_node_count: self.arena.node(slot).render_node_count,
            })
            .collect()
    }

    fn capture_region(&self, anchor: u32) -> Region {
        let start = self.arena.slot_index(anchor);
        let mut slots = Vec::new();
        if start.is_some() {
            self.arena.collect_rows(anchor, &mut slots);
        }
        Region {
            anchor,
            start,
            rows: slots
                .into_iter()
                .map(|s| self.location_of_slot(s))
                .collect(),
        }
    }

    /// Diff the anchor's rows against a capture taken before the mutation.
    fn finish_region(&self, before: Region) -> Option<TreeEvent> {
        let after = self.capture_region(before.anchor);
        let start = before.start.or(after.start)?;
        if before.rows == after.rows {
            return None;
        }
        Some(TreeEvent::Splice(ListSplice {
            start,
            delete_count: before.rows.len(),
            inserted: after.rows,
        }))
    }

    /// Highest node whose rows can change when `slot`'s children change: climbs past
    /// `Recurse` ancestors, whose visibility depends on their descendants.
    fn visibility_anchor(&self, mut slot: u32) -> u32 {
        loop {
            let node = self.arena.node(slot);
            match node.parent {
                Some(parent) if node.visibility == Visibility::Recurse => slot = parent,
                _ => return slot,
            }
        }
    }

    /// Re-resolve `Recurse` nodes from `slot` upwards after their children changed.
    fn resolve_recurse_ancestors(&mut self, mut slot: u32) {
        loop {
            let node = self.arena.node(slot);
            let Some(parent) = node.parent else {
                return;
            };
            if node.visibility != Visibility::Recurse {
                return;
            }
            let visible = node
                .children
                .iter()
                .any(|&c| self.arena.node(c).is_visible());
            self.arena
                .node_mut(slot)
                .flags
                .set(NodeFlags::VISIBLE, visible);
            slot = parent;
        }
    }

    fn splice_slot(
        &mut self,
        parent: u32,
        range: Range<usize>,
        descriptions: Vec<TreeElement<T>>,
    ) -> Result<()> {
        let mut staging = Staging(Vec::new());
        let roots = staging.push_all(descriptions, self.options.sorter.as_deref());

        let mut replaced = Vec::new();
        for &child in &self.arena.node(parent).children[range.clone()] {
            self.arena.collect_subtree(child, &mut replaced);
        }
        let replaced_set: HashSet<u32> = replaced.iter().copied().collect();
        self.check_unique(&staging, &replaced_set)?;

        let mut outcomes: Vec<Option<Outcome<F::Data>>> =
            (0..staging.0.len()).map(|_| None).collect();
        let parent_visibility = self.arena.node(parent).visibility;
        if parent_visibility == Visibility::Hidden {
            filter::mark_unreached(&staging, &roots, &mut outcomes);
        } else {
            filter::evaluate(
                &mut self.options.filter,
                &staging,
                &roots,
                parent_visibility,
                &mut outcomes,
            )
            .map_err(TreeError::Filter)?;
        }

        // Everything below only applies staged results and cannot fail.
        let region = self.capture_region(self.visibility_anchor(parent));

        let mut reusable = HashMap::with_capacity(replaced.len());
        for &slot in &replaced {
            if let Some(element) = self.arena.node(slot).element.as_ref() {
                if let Some((element, _)) = self.elements.remove_entry(element) {
                    reusable.insert(element, slot);
                }
            }
        }

        let depth = self.arena.node(parent).depth + 1;
        let mut staged: Vec<Option<Staged<T>>> = staging.0.into_iter().map(Some).collect();
        let mut built = Vec::with_capacity(roots.len());
        for &key in &roots {
            built.push(self.build(key, parent, depth, &mut staged, &mut outcomes, &mut reusable));
        }
        for (_, slot) in reusable.drain() {
            self.arena.remove(slot);
        }
        // New nodes start from a zero count and are not reported. Reused records still
        // carry their previous count, so a difference there is a real change.
        let mut recounted = Vec::new();
        for &slot in &built {
            self.arena.recount_subtree(slot, &mut recounted);
        }
        let mut changed: Vec<u32> = recounted
            .into_iter()
            .filter(|slot| replaced_set.contains(slot))
            .collect();

        let node = self.arena.node_mut(parent);
        let tail = node.children.split_off(range.end);
        node.children.truncate(range.start);
        node.children.extend(built);
        node.children.extend(tail);
        if node.parent.is_some() && !node.children.is_empty() {
            node.flags.insert(NodeFlags::COLLAPSIBLE);
        }
        self.sort_children(parent);
        self.resolve_recurse_ancestors(parent);

        self.arena.recount_path(parent, &mut changed);
        let mut events = self.count_events(&changed);
        events.extend(self.finish_region(region));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tree.splice",
            start = range.start,
            removed = range.len(),
            nodes = self.len(),
            rendered = self.rendered_len()
        );
        self.emit(events);
        Ok(())
    }

    /// Reject descriptions that repeat an element, among themselves or against nodes
    /// that survive the splice.
    fn check_unique(&self, staging: &Staging<T>, replaced: &HashSet<u32>) -> Result<()> {
        let mut seen = HashSet::with_capacity(staging.0.len());
        for staged in &staging.0 {
            if !seen.insert(&staged.element) {
                return Err(TreeError::DuplicateElement);
            }
            if let Some(slot) = self.elements.get(&staged.element) {
                if !replaced.contains(slot) {
                    return Err(TreeError::DuplicateElement);
                }
            }
        }
        Ok(())
    }

    fn build(
        &mut self,
        key: u32,
        parent: u32,
        depth: u32,
        staged: &mut [Option<Staged<T>>],
        outcomes: &mut [Option<Outcome<F::Data>>],
        reusable: &mut HashMap<T, u32>,
    ) -> u32 {
        let Staged {
            element,
            collapsible,
            collapsed,
            children,
        } = staged[key as usize]
            .take()
            .expect("each staged node is built once");
        let outcome = outcomes[key as usize]
            .take()
            .unwrap_or_else(Outcome::unreached);

        let (slot, previous) = match reusable.remove(&element) {
            Some(slot) => (slot, Some(self.arena.node(slot).is_collapsed())),
            None => (self.arena.insert(Node::new(None, Some(parent), depth)), None),
        };
        let collapsible = collapsible.unwrap_or(collapsed.is_some()) || !children.is_empty();
        let collapsed = collapsed
            .or(previous)
            .unwrap_or(self.options.collapse_by_default);

        let mut flags = NodeFlags::empty();
        flags.set(NodeFlags::COLLAPSIBLE, collapsible);
        flags.set(NodeFlags::COLLAPSED, collapsed);
        flags.set(NodeFlags::VISIBLE, outcome.visible);

        let mut child_slots = Vec::with_capacity(children.len());
        for child in children {
            child_slots.push(self.build(child, slot, depth + 1, staged, outcomes, reusable));
        }

        self.elements.insert(element.clone(), slot);
        let node = self.arena.node_mut(slot);
        node.element = Some(element);
        node.parent = Some(parent);
        node.children = child_slots;
        node.depth = depth;
        node.flags = flags;
        node.visibility = outcome.visibility;
        node.filter_data = outcome.data;
        slot
    }

    fn sort_children(&mut self, slot: u32) {
        let Some(sorter) = self.options.sorter.as_deref() else {
            return;
        };
        let mut children = core::mem::take(&mut self.arena.node_mut(slot).children);
        let arena = &self.arena;
        children.sort_by(|&a, &b| sorter.compare(arena.element(a), arena.element(b)));
        self.arena.node_mut(slot).children = children;
    }

    fn sort_subtree(&mut self, slot: u32, recursive: bool) {
        self.sort_children(slot);
        if recursive {
            let children = self.arena.node(slot).children.clone();
            for child in children {
                self.sort_subtree(child, true);
            }
        }
    }

    fn apply_collapse(
        &mut self,
        slot: u32,
        collapsed: bool,
        recursive: bool,
        touched: &mut Vec<u32>,
    ) {
        let node = self.arena.node_mut(slot);
        if node.is_collapsible() && node.is_collapsed() != collapsed {
            node.flags.set(NodeFlags::COLLAPSED, collapsed);
            touched.push(slot);
        }
        if recursive {
            let children = node.children.clone();
            for child in children {
                self.apply_collapse(child, collapsed, true, touched);
            }
        }
    }

    /// Expand the chain of collapsed only-children below an expanded `slot`.
    fn auto_expand(&mut self, mut slot: u32, touched: &mut Vec<u32>) {
        if self.arena.node(slot).is_collapsed() {
            return;
        }
        loop {
            let [child] = self.arena.node(slot).children[..] else {
                return;
            };
            let node = self.arena.node_mut(child);
            if !(node.is_collapsible() && node.is_collapsed()) {
                return;
            }
            node.flags.remove(NodeFlags::COLLAPSED);
            touched.push(child);
            slot = child;
        }
    }
}

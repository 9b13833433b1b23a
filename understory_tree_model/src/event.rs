// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification: events and the listener list.
//!
//! ## Ordering
//!
//! Listeners run synchronously, after the mutation has been fully applied, so they
//! observe post-mutation state. Within one mutation the model emits:
//!
//! 1. [`TreeEvent::RenderNodeCountChanged`] for every node whose count changed,
//!    bottom-up (a subtree in post-order, then its ancestors up to the root). Nodes
//!    created by the mutation are not reported; records reused by
//!    [`set_children`](crate::Model::set_children) are.
//! 2. At most one [`TreeEvent::Splice`], describing how the render order changed.
//! 3. [`TreeEvent::CollapseStateChanged`], once per
//!    [`set_collapsed`](crate::Model::set_collapsed) call that changed something.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::types::Location;

/// Patch to apply to a flattened list to bring it in sync with the render order.
///
/// Remove `delete_count` rows starting at `start`, then insert `inserted` at `start`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListSplice {
    /// First affected row.
    pub start: usize,
    /// Number of rows removed.
    pub delete_count: usize,
    /// Rows inserted in their place, in render order.
    pub inserted: Vec<Location>,
}

/// Event emitted by a [`Model`](crate::Model).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    /// A `set_collapsed` call changed the collapse state of `location`
    /// (and, when `deep`, possibly of its descendants).
    CollapseStateChanged {
        /// Node the call targeted.
        location: Location,
        /// Whether the call was recursive.
        deep: bool,
    },
    /// The cached render node count of `location` changed.
    RenderNodeCountChanged {
        /// The node whose count changed.
        location: Location,
        /// Its new count.
        render_node_count: usize,
    },
    /// The render order changed.
    Splice(ListSplice),
}

/// Handle returned by [`Model::subscribe`](crate::Model::subscribe).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TreeEvent)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `events` in order; every listener sees each event in subscription order.
    pub(crate) fn dispatch(&mut self, events: &[TreeEvent]) {
        for event in events {
            for (_, listener) in &mut self.entries {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        let a = {
            let seen = seen.clone();
            listeners.subscribe(Box::new(move |e| seen.borrow_mut().push(("a", e.clone()))))
        };
        let _b = {
            let seen = seen.clone();
            listeners.subscribe(Box::new(move |e| seen.borrow_mut().push(("b", e.clone()))))
        };
        let splice = TreeEvent::Splice(ListSplice::default());
        listeners.dispatch(&[splice.clone()]);
        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a), "second unsubscribe is a no-op");
        listeners.dispatch(&[splice.clone()]);
        assert_eq!(
            *seen.borrow(),
            vec![("a", splice.clone()), ("b", splice.clone()), ("b", splice)]
        );
        assert_eq!(listeners.len(), 1);
    }
}

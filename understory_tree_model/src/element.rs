// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative tree descriptions submitted to the model.
//!
//! A [`TreeElement`] names an element, its optional collapse flags and its
//! [`Children`]. Children are either a materialized list or a restartable
//! producer that is drained once, when the description is submitted.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Description of one element and its subtree.
pub struct TreeElement<T> {
    /// The user payload.
    pub element: T,
    /// Child descriptions, in insertion order.
    pub children: Children<T>,
    /// Whether the node can be collapsed.
    ///
    /// When unset, the node is collapsible if `collapsed` is set. A node with children
    /// is always collapsible.
    pub collapsible: Option<bool>,
    /// Initial collapse state.
    ///
    /// When unset, a re-submitted element keeps its previous state and a new one
    /// uses [`ModelOptions::collapse_by_default`](crate::ModelOptions::collapse_by_default).
    pub collapsed: Option<bool>,
}

impl<T> TreeElement<T> {
    /// A childless element with no explicit flags.
    pub fn new(element: T) -> Self {
        Self {
            element,
            children: Children::default(),
            collapsible: None,
            collapsed: None,
        }
    }

    /// Replace the children.
    #[must_use]
    pub fn with_children(mut self, children: impl Into<Children<T>>) -> Self {
        self.children = children.into();
        self
    }

    /// Set the initial collapse state.
    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Set whether the node can be collapsed.
    #[must_use]
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = Some(collapsible);
        self
    }
}

impl<T> From<T> for TreeElement<T> {
    fn from(element: T) -> Self {
        Self::new(element)
    }
}

impl<T: fmt::Debug> fmt::Debug for TreeElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeElement")
            .field("element", &self.element)
            .field("children", &self.children)
            .field("collapsible", &self.collapsible)
            .field("collapsed", &self.collapsed)
            .finish()
    }
}

type Producer<T> = Box<dyn Fn() -> Box<dyn Iterator<Item = TreeElement<T>>>>;

/// Children of a [`TreeElement`].
pub struct Children<T>(Source<T>);

enum Source<T> {
    Items(Vec<TreeElement<T>>),
    Lazy(Producer<T>),
}

impl<T> Children<T> {
    /// No children.
    pub fn empty() -> Self {
        Self(Source::Items(Vec::new()))
    }

    /// Children produced on demand.
    ///
    /// `produce` must be restartable: every call yields the same finite sequence.
    /// The model calls it once per submission and keeps the materialized result.
    pub fn lazy<F, I>(produce: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = TreeElement<T>>,
        I::IntoIter: 'static,
    {
        Self(Source::Lazy(Box::new(
            move || -> Box<dyn Iterator<Item = TreeElement<T>>> {
                Box::new(produce().into_iter())
            },
        )))
    }

    /// Returns `true` if the children come from a producer.
    pub fn is_lazy(&self) -> bool {
        matches!(self.0, Source::Lazy(_))
    }
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<TreeElement<T>>> for Children<T> {
    fn from(items: Vec<TreeElement<T>>) -> Self {
        Self(Source::Items(items))
    }
}

impl<T, const N: usize> From<[TreeElement<T>; N]> for Children<T> {
    fn from(items: [TreeElement<T>; N]) -> Self {
        Self(Source::Items(items.into()))
    }
}

impl<T> FromIterator<TreeElement<T>> for Children<T> {
    fn from_iter<I: IntoIterator<Item = TreeElement<T>>>(iter: I) -> Self {
        Self(Source::Items(iter.into_iter().collect()))
    }
}

impl<T> IntoIterator for Children<T> {
    type Item = TreeElement<T>;
    type IntoIter = alloc::vec::IntoIter<TreeElement<T>>;

    fn into_iter(self) -> Self::IntoIter {
        match self.0 {
            Source::Items(items) => items.into_iter(),
            Source::Lazy(produce) => produce().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Children<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Source::Items(items) => f.debug_list().entries(items).finish(),
            Source::Lazy(_) => f.write_str("Children(<lazy>)"),
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model configuration: filter, sorter, and collapse defaults.

use alloc::boxed::Box;
use core::cmp::Ordering;
use core::fmt;

use crate::filter::AcceptAll;

/// Orders sibling elements.
///
/// Applied as a stable sort over every sibling list before it is flattened, so
/// elements that compare equal keep their declared order.
/// Closures of the shape `Fn(&T, &T) -> Ordering` implement this trait.
pub trait TreeSorter<T> {
    /// Compare two siblings.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, Func> TreeSorter<T> for Func
where
    Func: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Options for [`Model::with_options`](crate::Model::with_options).
///
/// ```
/// use understory_tree_model::{FilterResult, Model, ModelOptions, Visibility};
///
/// let options = ModelOptions::new()
///     .with_filter(|e: &&'static str, _: Visibility| {
///         FilterResult::<()>::from(!e.starts_with('.'))
///     })
///     .with_sorter(|a: &&'static str, b: &&'static str| a.cmp(b))
///     .collapse_by_default(true);
/// let model: Model<&'static str, _> = Model::with_options(options);
/// assert_eq!(model.rendered_len(), 0);
/// ```
pub struct ModelOptions<T, F = AcceptAll> {
    /// Decides element visibility.
    pub filter: F,
    /// Orders siblings; `None` keeps insertion order.
    pub sorter: Option<Box<dyn TreeSorter<T>>>,
    /// Initial collapse state for elements whose description leaves it unset.
    pub collapse_by_default: bool,
    /// When a node is expanded non-recursively and its only child is collapsed,
    /// expand that child too, repeatedly.
    pub auto_expand_single_children: bool,
}

impl<T> ModelOptions<T> {
    /// Default options: accept everything, insertion order, expanded.
    pub fn new() -> Self {
        Self {
            filter: AcceptAll,
            sorter: None,
            collapse_by_default: false,
            auto_expand_single_children: false,
        }
    }
}

impl<T> Default for ModelOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> ModelOptions<T, F> {
    /// Replace the filter.
    pub fn with_filter<G>(self, filter: G) -> ModelOptions<T, G> {
        ModelOptions {
            filter,
            sorter: self.sorter,
            collapse_by_default: self.collapse_by_default,
            auto_expand_single_children: self.auto_expand_single_children,
        }
    }

    /// Set the sibling sorter.
    #[must_use]
    pub fn with_sorter(mut self, sorter: impl TreeSorter<T> + 'static) -> Self {
        self.sorter = Some(Box::new(sorter));
        self
    }

    /// Set [`collapse_by_default`](Self::collapse_by_default).
    #[must_use]
    pub fn collapse_by_default(mut self, collapsed: bool) -> Self {
        self.collapse_by_default = collapsed;
        self
    }

    /// Set [`auto_expand_single_children`](Self::auto_expand_single_children).
    #[must_use]
    pub fn auto_expand_single_children(mut self, enabled: bool) -> Self {
        self.auto_expand_single_children = enabled;
        self
    }
}

impl<T, F: fmt::Debug> fmt::Debug for ModelOptions<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("filter", &self.filter)
            .field("sorted", &self.sorter.is_some())
            .field("collapse_by_default", &self.collapse_by_default)
            .field(
                "auto_expand_single_children",
                &self.auto_expand_single_children,
            )
            .finish()
    }
}

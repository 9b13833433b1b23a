// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tree Model: the data model behind a virtualized tree view.
//!
//! A tree view renders a hierarchy as a flat, scrollable list of rows. This crate keeps
//! that list in sync with the hierarchy, so a virtualized list widget only ever asks
//! "how many rows?" and "what is row `i`?".
//!
//! - Holds a tree of user elements, each with collapse state and filter results.
//! - Applies a user filter with [`Visibility::Hidden`], [`Visibility::Visible`] and
//!   [`Visibility::Recurse`] outcomes, where `Recurse` shows a node only when one of its
//!   descendants is shown.
//! - Caches per-node render counts, so row lookups and list indices cost
//!   `O(depth × siblings)` instead of a full walk.
//! - Emits [`TreeEvent`]s describing exactly how the flattened list changed.
//!
//! ## Not a widget
//!
//! This crate does not draw, measure, or handle input.
//! Rendering, keyboard handling, drag and drop, and type-ahead are left to the view layer,
//! which consumes [`TreeEvent::Splice`] patches and [`TreeNode`] views.
//!
//! ## API overview
//!
//! - [`Model`]: owns the nodes; structural and collapse mutations, refiltering, lookups.
//! - [`TreeElement`] / [`Children`]: declarative subtree descriptions for
//!   [`Model::set_children`] and [`Model::splice`]. Children may be produced lazily.
//! - [`Location`]: generational handle of a node; stale handles are detected.
//! - [`TreeNode`]: read-only view of a node (element, depth, flags, filter data).
//! - [`TreeFilter`] / [`FilterResult`]: the filter contract. Plain closures work.
//! - [`TreeSorter`]: optional sibling order. Plain closures work.
//! - [`Navigator`]: a cursor stepping through the rendered rows.
//! - [`TreeEvent`] / [`ListSplice`]: change notifications.
//! - [`TreeError`]: what can go wrong. Failed mutations leave the model untouched.
//!
//! Key operations:
//! - [`Model::set_children`](Model::set_children) / [`Model::splice`](Model::splice) / [`Model::remove`](Model::remove)
//! - [`Model::set_collapsed`](Model::set_collapsed) and [`Model::expand_to`](Model::expand_to)
//! - [`Model::refilter`](Model::refilter) after the filter's inputs change
//! - [`Model::rendered_len`](Model::rendered_len), [`Model::node_at`](Model::node_at) and
//!   [`Model::list_index`](Model::list_index) for virtualization
//!
//! ## Render counts
//!
//! Every node caches how many rows its subtree contributes:
//!
//! - a node that failed the filter contributes `0`;
//! - a collapsed node contributes `1`, its own row;
//! - otherwise a node contributes `1` plus the sum over its children.
//!
//! The root is never rendered and contributes only the sum over its children.
//! Children of a collapsed node keep the counts they would have if it were expanded,
//! so expanding is a matter of re-adding them.
//!
//! ## Events
//!
//! Listeners registered with [`Model::subscribe`] run after a mutation has been fully
//! applied. Per mutation they see count changes bottom-up, then at most one splice,
//! then (for collapse changes) a single [`TreeEvent::CollapseStateChanged`].
//!
//! ## Features
//!
//! - `tracing`: emit `debug`/`trace` spans for mutations via the `tracing` crate.
//!
//! # Example
//!
//! ```rust
//! use understory_tree_model::{FilterResult, Model, ModelOptions, TreeElement, Visibility};
//!
//! // Hide dotfiles; folders show when something inside them does.
//! let filter = |name: &&'static str, _: Visibility| -> FilterResult<()> {
//!     if name.ends_with('/') {
//!         FilterResult::recurse()
//!     } else {
//!         (!name.starts_with('.')).into()
//!     }
//! };
//! let mut model = Model::with_options(ModelOptions::new().with_filter(filter));
//!
//! model
//!     .set_children(
//!         model.root(),
//!         [
//!             TreeElement::new("src/")
//!                 .with_children([TreeElement::new("lib.rs"), TreeElement::new(".keep")]),
//!             TreeElement::new("cfg/").with_children([TreeElement::new(".env")]),
//!             TreeElement::new("README.md"),
//!         ],
//!     )
//!     .unwrap();
//!
//! let rows: Vec<_> = model.rendered().map(|n| *n.element().unwrap()).collect();
//! assert_eq!(rows, ["src/", "lib.rs", "README.md"]);
//!
//! // Collapse a folder: its row stays, its children go.
//! let src = model.location_of(&"src/").unwrap();
//! model.set_collapsed(src, Some(true), false).unwrap();
//! assert_eq!(model.rendered_len(), 2);
//! assert_eq!(model.list_index(model.location_of(&"README.md").unwrap()).unwrap(), Some(1));
//! ```
//!
//! This crate uses `std` for hashing elements to locations.

extern crate alloc;

mod element;
mod error;
mod event;
mod filter;
mod model;
mod navigator;
mod node;
mod options;
mod types;

pub use element::{Children, TreeElement};
pub use error::{Result, TreeError};
pub use event::{ListSplice, SubscriptionId, TreeEvent};
pub use filter::{AcceptAll, FilterError, FilterResult, TreeFilter};
pub use model::Model;
pub use navigator::{Navigator, Rendered};
pub use node::TreeNode;
pub use options::{ModelOptions, TreeSorter};
pub use types::{Location, Visibility};

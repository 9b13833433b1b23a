// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter engine: per-node visibility with `Recurse` resolution.
//!
//! ## Semantics
//!
//! - The filter is called once per node per pass, with the node's element and the
//!   raw [`Visibility`] its parent's filter call produced ([`Visibility::Visible`]
//!   for top-level elements).
//! - [`Visibility::Hidden`] removes the node and its whole subtree from the render
//!   order. Descendants of a hidden node are not offered to the filter.
//! - [`Visibility::Recurse`] resolves to visible iff at least one descendant resolves
//!   to visible, so children are evaluated before their `Recurse` parent is resolved.
//!   A childless `Recurse` node is never visible.
//! - Data returned with a result is stored on the node whatever the outcome.
//!
//! A pass only records outcomes; the model applies them once the whole pass succeeded.

use alloc::boxed::Box;

use crate::types::Visibility;

/// Error type a fallible filter reports. It is surfaced as
/// [`TreeError::Filter`](crate::TreeError::Filter).
pub type FilterError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result of a single filter call: a visibility plus optional data for the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterResult<D> {
    /// How the node participates in the render order.
    pub visibility: Visibility,
    /// Opaque data forwarded to the renderer (for example match highlights).
    pub data: Option<D>,
}

impl<D> FilterResult<D> {
    /// Hide the node and its subtree.
    pub const fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            data: None,
        }
    }

    /// Show the node.
    pub const fn visible() -> Self {
        Self {
            visibility: Visibility::Visible,
            data: None,
        }
    }

    /// Show the node iff a descendant is shown.
    pub const fn recurse() -> Self {
        Self {
            visibility: Visibility::Recurse,
            data: None,
        }
    }

    /// A visibility with attached data.
    pub const fn with_data(visibility: Visibility, data: D) -> Self {
        Self {
            visibility,
            data: Some(data),
        }
    }
}

impl<D> From<Visibility> for FilterResult<D> {
    fn from(visibility: Visibility) -> Self {
        Self {
            visibility,
            data: None,
        }
    }
}

impl<D> From<bool> for FilterResult<D> {
    fn from(visible: bool) -> Self {
        Visibility::from(visible).into()
    }
}

/// Decides the visibility of elements.
///
/// Closures of the shape `FnMut(&T, Visibility) -> FilterResult<D>` implement this trait.
/// Implement it directly for filters that can fail or carry their own state.
pub trait TreeFilter<T> {
    /// Data attached to nodes and forwarded to the renderer.
    type Data;

    /// Filter one element, given its parent's raw visibility.
    fn filter(
        &mut self,
        element: &T,
        parent_visibility: Visibility,
    ) -> Result<FilterResult<Self::Data>, FilterError>;
}

impl<T, D, Func> TreeFilter<T> for Func
where
    Func: FnMut(&T, Visibility) -> FilterResult<D>,
{
    type Data = D;

    fn filter(
        &mut self,
        element: &T,
        parent_visibility: Visibility,
    ) -> Result<FilterResult<D>, FilterError> {
        Ok(self(element, parent_visibility))
    }
}

/// The default filter: every element is visible.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl<T> TreeFilter<T> for AcceptAll {
    type Data = ();

    fn filter(&mut self, _: &T, _: Visibility) -> Result<FilterResult<()>, FilterError> {
        Ok(FilterResult::visible())
    }
}

/// Structure the engine walks: keyed nodes with elements and ordered children.
pub(crate) trait FilterSource<T> {
    fn element(&self, key: u32) -> &T;
    fn children(&self, key: u32) -> &[u32];
}

/// Recorded outcome for one node.
#[derive(Debug)]
pub(crate) struct Outcome<D> {
    pub(crate) visibility: Visibility,
    pub(crate) visible: bool,
    pub(crate) data: Option<D>,
}

impl<D> Outcome<D> {
    /// Outcome for a node below a hidden ancestor.
    pub(crate) const fn unreached() -> Self {
        Self {
            visibility: Visibility::Hidden,
            visible: false,
            data: None,
        }
    }
}

/// Filter the subtrees rooted at `keys`, writing one outcome per node into `out`
/// (indexed by key). Returns whether any of them resolved to visible.
pub(crate) fn evaluate<T, F, S>(
    filter: &mut F,
    source: &S,
    keys: &[u32],
    parent_visibility: Visibility,
    out: &mut [Option<Outcome<F::Data>>],
) -> Result<bool, FilterError>
where
    F: TreeFilter<T> + ?Sized,
    S: FilterSource<T> + ?Sized,
{
    let mut any_visible = false;
    for &key in keys {
        any_visible |= evaluate_node(filter, source, key, parent_visibility, out)?;
    }
    Ok(any_visible)
}

fn evaluate_node<T, F, S>(
    filter: &mut F,
    source: &S,
    key: u32,
    parent_visibility: Visibility,
    out: &mut [Option<Outcome<F::Data>>],
) -> Result<bool, FilterError>
where
    F: TreeFilter<T> + ?Sized,
    S: FilterSource<T> + ?Sized,
{
    let FilterResult { visibility, data } = filter.filter(source.element(key), parent_visibility)?;
    if visibility == Visibility::Hidden {
        out[key as usize] = Some(Outcome {
            visibility,
            visible: false,
            data,
        });
        mark_unreached(source, source.children(key), out);
        return Ok(false);
    }
    let descendant_visible = evaluate(filter, source, source.children(key), visibility, out)?;
    let visible = visibility == Visibility::Visible || descendant_visible;
    out[key as usize] = Some(Outcome {
        visibility,
        visible,
        data,
    });
    Ok(visible)
}

/// Record every node under `keys` as unreached without consulting the filter.
pub(crate) fn mark_unreached<T, S, D>(source: &S, keys: &[u32], out: &mut [Option<Outcome<D>>])
where
    S: FilterSource<T> + ?Sized,
{
    for &key in keys {
        out[key as usize] = Some(Outcome::unreached());
        mark_unreached(source, source.children(key), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// A flat test tree: `(element, children)` per key.
    struct Flat(Vec<(&'static str, Vec<u32>)>);

    impl FilterSource<&'static str> for Flat {
        fn element(&self, key: u32) -> &&'static str {
            &self.0[key as usize].0
        }

        fn children(&self, key: u32) -> &[u32] {
            &self.0[key as usize].1
        }
    }

    fn run<F: TreeFilter<&'static str>>(
        filter: &mut F,
        tree: &Flat,
        roots: &[u32],
    ) -> Vec<Option<Outcome<F::Data>>> {
        let mut out: Vec<_> = (0..tree.0.len()).map(|_| None).collect();
        evaluate(filter, tree, roots, Visibility::Visible, &mut out).unwrap();
        out
    }

    fn visible(out: &[Option<Outcome<()>>], key: u32) -> bool {
        out[key as usize].as_ref().unwrap().visible
    }

    #[test]
    fn recurse_resolves_from_descendants() {
        // folder -> [file1, file2]
        let tree = Flat(vec![("folder", vec![1, 2]), ("file1", vec![]), ("file2", vec![])]);
        let mut filter = |e: &&'static str, _: Visibility| -> FilterResult<()> {
            match *e {
                "folder" => FilterResult::recurse(),
                "file1" => FilterResult::hidden(),
                _ => FilterResult::visible(),
            }
        };
        let out = run(&mut filter, &tree, &[0]);
        assert!(visible(&out, 0), "folder has a visible descendant");
        assert!(!visible(&out, 1));
        assert!(visible(&out, 2));
    }

    #[test]
    fn recurse_without_visible_descendants_is_hidden() {
        let tree = Flat(vec![("folder", vec![1]), ("file", vec![]), ("empty", vec![])]);
        let mut filter = |e: &&'static str, _: Visibility| -> FilterResult<()> {
            match *e {
                "file" => FilterResult::hidden(),
                _ => FilterResult::recurse(),
            }
        };
        let out = run(&mut filter, &tree, &[0, 2]);
        assert!(!visible(&out, 0));
        assert!(!visible(&out, 2), "childless recurse is never visible");
    }

    #[test]
    fn hidden_subtree_is_not_consulted() {
        let tree = Flat(vec![("x", vec![1]), ("y", vec![])]);
        let mut calls = Vec::new();
        let mut filter = |e: &&'static str, _: Visibility| {
            calls.push(*e);
            FilterResult::<()>::from(*e != "x")
        };
        let out = run(&mut filter, &tree, &[0]);
        assert_eq!(calls, vec!["x"]);
        let y = out[1].as_ref().unwrap();
        assert_eq!(y.visibility, Visibility::Hidden);
        assert!(!y.visible);
    }

    #[test]
    fn parent_visibility_is_the_raw_outcome() {
        let tree = Flat(vec![("folder", vec![1]), ("leaf", vec![])]);
        let mut seen = Vec::new();
        let mut filter = |e: &&'static str, parent: Visibility| {
            seen.push((*e, parent));
            if *e == "folder" {
                FilterResult::<()>::recurse()
            } else {
                FilterResult::visible()
            }
        };
        let _ = run(&mut filter, &tree, &[0]);
        assert_eq!(
            seen,
            vec![
                ("folder", Visibility::Visible),
                ("leaf", Visibility::Recurse)
            ]
        );
    }

    #[test]
    fn data_is_kept_for_hidden_nodes() {
        let tree = Flat(vec![("a", vec![])]);
        let mut filter =
            |_: &&'static str, _: Visibility| FilterResult::with_data(Visibility::Hidden, 7_u8);
        let out = run(&mut filter, &tree, &[0]);
        assert_eq!(out[0].as_ref().unwrap().data, Some(7));
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by every fallible model operation.

use thiserror::Error;

use crate::filter::FilterError;
use crate::types::Location;

/// Errors reported by [`Model`](crate::Model) operations.
///
/// A failed operation never leaves the model half-updated: all filter calls and
/// structural checks run before the first node is touched, so after an `Err` the
/// structure, flags, cached counts and filter data are exactly as before the call.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The location pointed at a node that has since been removed.
    #[error("location {0:?} does not refer to a live node")]
    NotFound(Location),
    /// The location was minted by another model instance, or before a reset,
    /// or names the root where a regular node is required.
    #[error("location {0:?} is not valid for this model")]
    InvalidLocation(Location),
    /// The node exists but is not part of the current render order.
    #[error("location {0:?} is not rendered")]
    NotRendered(Location),
    /// An element would appear more than once in the tree.
    #[error("element appears more than once in the tree")]
    DuplicateElement,
    /// An index or range bound was past the end of the sequence it addresses.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the addressed sequence.
        len: usize,
    },
    /// The configured filter failed; the mutation was not applied.
    #[error("filter failed")]
    Filter(#[source] FilterError),
}

/// Result alias for tree model operations.
pub type Result<T, E = TreeError> = core::result::Result<T, E>;

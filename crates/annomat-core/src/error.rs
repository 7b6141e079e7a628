//! Error types for annotated-matrix operations.
//!
//! Every fallible operation in the workspace returns [`AnnError`]. Errors are
//! detected synchronously at the offending call, before any state changes,
//! so a returned error always means the target was left untouched.

use thiserror::Error;

use crate::axis::Axis;

/// Errors from indexing, element access, and structural mutation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnnError {
    /// A 2-D array does not have the dimensions its target requires.
    ///
    /// Raised by whole-matrix replacement, sub-slice assignment, and
    /// `obsm`/`varm` entry or whole-map replacement. `expected_cols` is
    /// `None` when only the leading dimension is constrained.
    #[error(
        "{target}: expected shape {}, found {found_rows}x{found_cols}",
        expected_shape(.expected_rows, .expected_cols)
    )]
    Shape {
        /// What was being written (e.g. `X`, `obsm['pca']`).
        target: String,
        /// Required leading dimension.
        expected_rows: usize,
        /// Required trailing dimension, if constrained.
        expected_cols: Option<usize>,
        /// Leading dimension of the rejected array.
        found_rows: usize,
        /// Trailing dimension of the rejected array.
        found_cols: usize,
    },

    /// A 1-D sequence does not match the axis it annotates.
    #[error("{target}: expected length {expected}, found {found}")]
    Length {
        /// What was being written (e.g. `obs['cell_type']`, `var_names`).
        target: String,
        /// Required length.
        expected: usize,
        /// Length of the rejected sequence.
        found: usize,
    },

    /// Lookup of a key that is not present.
    #[error("key '{key}' not found in {map}")]
    KeyNotFound {
        /// The map that was searched (e.g. `uns`, `varm`, `obs_names`).
        map: String,
        /// The missing key.
        key: String,
    },

    /// A position is outside the axis extent.
    #[error("index {index} out of bounds for {axis} axis of extent {extent}")]
    IndexOutOfBounds {
        /// Axis the position refers to.
        axis: Axis,
        /// The offending position.
        index: usize,
        /// Extent of the axis.
        extent: usize,
    },

    /// A selector that cannot be normalized into a selection.
    #[error("invalid {axis} selector: {reason}")]
    InvalidSelector {
        /// Axis the selector was applied to.
        axis: Axis,
        /// Description of the problem.
        reason: String,
    },

    /// An axis name appears more than once.
    #[error("duplicate name '{name}' in {}", names_index(.axis))]
    DuplicateName {
        /// Axis whose names collide.
        axis: Axis,
        /// The repeated name.
        name: String,
    },
}

fn expected_shape(rows: &usize, cols: &Option<usize>) -> String {
    match cols {
        Some(cols) => format!("{rows}x{cols}"),
        None => format!("{rows}x_"),
    }
}

fn names_index(axis: &Axis) -> &'static str {
    axis.names_name()
}

impl AnnError {
    /// Shorthand for a [`AnnError::KeyNotFound`].
    pub fn key_not_found(map: impl Into<String>, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            map: map.into(),
            key: key.into(),
        }
    }
}

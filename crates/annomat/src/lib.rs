//! annomat: annotated 2-D data matrices with copy-on-write views.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the annomat sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use annomat::prelude::*;
//! use ndarray::array;
//!
//! let root = AnnotatedMatrixConfig::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
//!     .with_obs(Annotations::new(["a", "b", "c"]).with_column("n", 0..3i64))
//!     .build()
//!     .unwrap();
//!
//! // Indexing yields a view sharing the root's storage.
//! let mut view = root.slice(["c", "a"], ..).unwrap();
//! assert!(view.is_view());
//!
//! // Element writes go through to the root.
//! view.x().set(0, 0, 50.0).unwrap();
//! assert_eq!(root.x().get(2, 0), Some(50.0));
//!
//! // Structural writes detach the view first.
//! view.set_obs_column("flag", vec![true, false]).unwrap();
//! assert!(!view.is_view());
//! assert!(!root.obs().contains_column("flag"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `annomat-core` | Axes, selectors, columns, values, errors |
//! | [`data`] | `annomat-data` | Storage components, the container, construction config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`annomat-core`).
///
/// Contains [`types::Axis`], [`types::SelectorSpec`] and
/// [`types::Selection`], [`types::Column`], [`types::Value`], and
/// [`types::AnnError`].
pub use annomat_core as types;

/// Storage components and the container (`annomat-data`).
///
/// [`data::AnnotatedMatrix`] is the entry point; build one with
/// [`data::AnnotatedMatrixConfig`].
pub use annomat_data as data;

/// Common imports for typical annomat usage.
///
/// ```rust
/// use annomat::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use annomat_core::{AnnError, Axis, Column, Scalar, Selection, SelectorSpec, Value};

    // Container
    pub use annomat_data::{
        AnnotatedMatrix, AnnotatedMatrixConfig, Annotations, ArrayMap, ContainerState, ValueMap,
    };
}

//! Core types for the annomat annotated-matrix workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate: the [`Axis`] enum, selectors
//! ([`SelectorSpec`] and its normalized form [`Selection`]), typed scalar
//! columns ([`Column`]), free-form metadata values ([`Value`]), and the
//! [`AnnError`] taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod column;
pub mod error;
pub mod select;
pub mod value;

pub use axis::Axis;
pub use column::{Categorical, Column, ColumnKind, Scalar};
pub use error::AnnError;
pub use select::{Selection, SelectorSpec};
pub use value::Value;

//! Annotated matrix storage and the container built on it.
//!
//! Provides [`AnnotatedMatrix`]: a numeric matrix with per-axis annotation
//! tables, per-axis multi-array maps, and unstructured metadata. Indexing a
//! container yields a View that shares the Owned ancestor's storage; the
//! first structural mutation on a View copies what it addresses and turns
//! it into an independent Owned container.
//!
//! Storage is reference-counted with interior mutability (`Rc<RefCell<_>>`),
//! so containers are single-threaded (`!Send`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis_table;
pub mod config;
pub mod container;
mod materialize;
pub mod matrix;
pub mod multi_array;
pub mod unstructured;

pub use axis_table::{Annotations, AxisTable};
pub use config::AnnotatedMatrixConfig;
pub use container::{AnnotatedMatrix, ContainerState};
pub use matrix::MatrixStore;
pub use multi_array::{ArrayMap, MultiArrayMap};
pub use unstructured::{UnstructuredMap, ValueMap};

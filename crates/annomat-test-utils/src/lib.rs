//! Test utilities for annomat development.
//!
//! Provides container fixtures ([`annotated_3x3`], [`zeros_100x100`],
//! [`counting`]) and [`fingerprint`], a deterministic content hash used to
//! assert that a container did or did not change.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fingerprint;
pub mod fixtures;

pub use fingerprint::fingerprint;
pub use fixtures::{annotated_3x3, counting, zeros_100x100};

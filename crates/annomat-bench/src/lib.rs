//! Benchmark profiles for annomat.
//!
//! - [`reference_profile`]: 10K × 2K matrix with annotated axes and one
//!   multi-array entry per axis.
//! - [`half_rows`]: the selector used for the standard row-subset view.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use annomat_core::{Column, SelectorSpec};
use annomat_data::{AnnotatedMatrix, AnnotatedMatrixConfig, Annotations};
use ndarray::Array2;

/// Rows in the reference profile.
pub const REFERENCE_OBS: usize = 10_000;
/// Columns in the reference profile.
pub const REFERENCE_VARS: usize = 2_000;

/// Build the reference benchmark container.
///
/// `obs` carries a categorical and a float column, `var` a float column,
/// and `obsm["pca"]`/`varm["loadings"]` are 50 columns wide.
pub fn reference_profile() -> Result<AnnotatedMatrix, annomat_core::AnnError> {
    let (n, m) = (REFERENCE_OBS, REFERENCE_VARS);
    let obs = Annotations::positional(n)
        .with_column(
            "cluster",
            Column::categorical((0..n).map(|i| format!("c{}", i % 12))),
        )
        .with_column("depth", (0..n).map(|i| i as f64).collect::<Vec<f64>>());
    let var = Annotations::positional(m)
        .with_column("mean", (0..m).map(|j| j as f64 * 0.5).collect::<Vec<f64>>());
    AnnotatedMatrixConfig::new(Array2::from_shape_fn((n, m), |(i, j)| ((i + j) % 7) as f32))
        .with_obs(obs)
        .with_var(var)
        .with_obsm("pca", Array2::zeros((n, 50)))
        .with_varm("loadings", Array2::zeros((m, 50)))
        .build()
}

/// Every second row of the reference profile.
pub fn half_rows() -> SelectorSpec {
    SelectorSpec::Indices((0..REFERENCE_OBS).step_by(2).collect())
}

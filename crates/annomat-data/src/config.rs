//! Container construction config and validation.
//!
//! [`AnnotatedMatrixConfig`] is the builder-input for an Owned
//! [`AnnotatedMatrix`]. [`validate()`](AnnotatedMatrixConfig::validate)
//! checks every alignment invariant before any storage is built;
//! [`build()`](AnnotatedMatrixConfig::build) validates and constructs.

use annomat_core::{AnnError, Axis, Column, Value};
use ndarray::Array2;

use crate::axis_table::{validate_annotations, Annotations, AxisTable};
use crate::container::AnnotatedMatrix;
use crate::materialize::Components;
use crate::matrix::MatrixStore;
use crate::multi_array::{validate_map, ArrayMap, MultiArrayMap};
use crate::unstructured::{UnstructuredMap, ValueMap};

/// Everything needed to construct an [`AnnotatedMatrix`].
///
/// `obs` and `var` default to positional names (`"0"`, `"1"`, …) with no
/// columns when left as `None`.
#[derive(Clone, Debug)]
pub struct AnnotatedMatrixConfig {
    /// The `n_obs × n_vars` data matrix.
    pub x: Array2<f32>,
    /// Observation annotations; `n_obs` names.
    pub obs: Option<Annotations>,
    /// Variable annotations; `n_vars` names.
    pub var: Option<Annotations>,
    /// Observation-aligned arrays; each has `n_obs` rows.
    pub obsm: ArrayMap,
    /// Variable-aligned arrays; each has `n_vars` rows.
    pub varm: ArrayMap,
    /// Unstructured metadata.
    pub uns: ValueMap,
}

impl AnnotatedMatrixConfig {
    /// A config holding only `x`.
    pub fn new(x: Array2<f32>) -> Self {
        Self {
            x,
            obs: None,
            var: None,
            obsm: ArrayMap::new(),
            varm: ArrayMap::new(),
            uns: ValueMap::new(),
        }
    }

    /// Set the observation annotations.
    pub fn with_obs(mut self, obs: Annotations) -> Self {
        self.obs = Some(obs);
        self
    }

    /// Set the variable annotations.
    pub fn with_var(mut self, var: Annotations) -> Self {
        self.var = Some(var);
        self
    }

    /// Add one observation column, creating positional `obs` if unset.
    pub fn with_obs_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        let n_obs = self.x.nrows();
        let obs = self
            .obs
            .take()
            .unwrap_or_else(|| Annotations::positional(n_obs));
        self.obs = Some(obs.with_column(name, column));
        self
    }

    /// Add one variable column, creating positional `var` if unset.
    pub fn with_var_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        let n_vars = self.x.ncols();
        let var = self
            .var
            .take()
            .unwrap_or_else(|| Annotations::positional(n_vars));
        self.var = Some(var.with_column(name, column));
        self
    }

    /// Add one `obsm` entry.
    pub fn with_obsm(mut self, key: impl Into<String>, value: Array2<f32>) -> Self {
        self.obsm.insert(key.into(), value);
        self
    }

    /// Add one `varm` entry.
    pub fn with_varm(mut self, key: impl Into<String>, value: Array2<f32>) -> Self {
        self.varm.insert(key.into(), value);
        self
    }

    /// Add one `uns` entry.
    pub fn with_uns(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.uns.insert(key.into(), value.into());
        self
    }

    /// Validate all alignment invariants.
    pub fn validate(&self) -> Result<(), AnnError> {
        let (n_obs, n_vars) = self.x.dim();
        // 1. Axis tables: one unique name per position, full-length columns.
        if let Some(obs) = &self.obs {
            validate_annotations(Axis::Obs, obs, n_obs)?;
        }
        if let Some(var) = &self.var {
            validate_annotations(Axis::Var, var, n_vars)?;
        }
        // 2. Multi-array leading dimensions.
        validate_map(Axis::Obs, n_obs, &self.obsm)?;
        validate_map(Axis::Var, n_vars, &self.varm)?;
        Ok(())
    }

    /// Validate, then build an Owned container.
    pub fn build(self) -> Result<AnnotatedMatrix, AnnError> {
        self.validate()?;
        let (n_obs, n_vars) = self.x.dim();
        let obs = self.obs.unwrap_or_else(|| Annotations::positional(n_obs));
        let var = self.var.unwrap_or_else(|| Annotations::positional(n_vars));
        Ok(AnnotatedMatrix::from_parts(Components {
            x: MatrixStore::new(self.x),
            obs: AxisTable::from_annotations(Axis::Obs, obs)?,
            var: AxisTable::from_annotations(Axis::Var, var)?,
            obsm: MultiArrayMap::from_entries(Axis::Obs, n_obs, self.obsm)?,
            varm: MultiArrayMap::from_entries(Axis::Var, n_vars, self.varm)?,
            uns: UnstructuredMap::from_entries(self.uns),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn valid_config() -> AnnotatedMatrixConfig {
        AnnotatedMatrixConfig::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
            .with_obs(Annotations::new(["c1", "c2", "c3"]).with_column("n", 0..3i64))
            .with_var_column("mean", vec![0.5f64, 1.5])
            .with_obsm("pca", Array2::zeros((3, 4)))
            .with_uns("title", "demo")
    }

    #[test]
    fn validate_valid_config_succeeds() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn build_fills_positional_names() {
        let m = AnnotatedMatrixConfig::new(Array2::zeros((2, 2))).build().unwrap();
        assert_eq!(m.obs_names(), ["0", "1"]);
        let m = valid_config().build().unwrap();
        assert_eq!(m.var_names(), ["0", "1"]);
        assert_eq!(m.obs_names(), ["c1", "c2", "c3"]);
        assert_eq!(m.obsm().entry_shape("pca").unwrap(), (3, 4));
        assert_eq!(m.uns().get("title").unwrap(), Value::from("demo"));
    }

    #[test]
    fn validate_wrong_obs_length_fails() {
        let mut cfg = valid_config();
        cfg.obs = Some(Annotations::new(["only"]));
        match cfg.validate() {
            Err(AnnError::Length { expected: 3, found: 1, .. }) => {}
            other => panic!("expected Length, got {other:?}"),
        }
    }

    #[test]
    fn validate_duplicate_var_names_fails() {
        let cfg = valid_config().with_var(Annotations::new(["g", "g"]));
        match cfg.validate() {
            Err(AnnError::DuplicateName { axis: Axis::Var, .. }) => {}
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }

    #[test]
    fn validate_misaligned_varm_fails() {
        let cfg = valid_config().with_varm("loadings", Array2::zeros((3, 2)));
        match cfg.validate() {
            Err(AnnError::Shape { expected_rows: 2, found_rows: 3, .. }) => {}
            other => panic!("expected Shape, got {other:?}"),
        }
    }
}

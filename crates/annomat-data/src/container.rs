//! The annotated matrix container.
//!
//! [`AnnotatedMatrix`] pairs a numeric matrix `X` (`n_obs × n_vars`) with
//! per-axis annotation tables (`obs`, `var`), per-axis multi-array maps
//! (`obsm`, `varm`), and an unstructured map (`uns`).
//!
//! # Views
//!
//! [`slice`](AnnotatedMatrix::slice) returns a View: a container whose
//! components alias the Owned ancestor's storage through composed
//! selections. Reads resolve through that storage, so they are always live.
//! Elementwise matrix writes (`x().set`, `x().assign`) write through to the
//! ancestor. Every structural mutation (the `set_*` and `remove_*` methods)
//! is validated first, then materializes the View, so the ancestor never
//! observes it.

use std::fmt;

use annomat_core::{AnnError, Axis, Column, Selection, SelectorSpec, Value};
use ndarray::Array2;

use crate::axis_table::{Annotations, AxisTable};
use crate::materialize::{ensure_owned, Backing, Components};
use crate::matrix::MatrixStore;
use crate::multi_array::{ArrayMap, MultiArrayMap};
use crate::unstructured::{UnstructuredMap, ValueMap};

/// Whether a container owns its storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerState {
    /// The container's storage is its own.
    Owned,
    /// The container aliases an Owned ancestor's storage.
    View,
}

/// An annotated 2-D data matrix.
#[derive(Debug)]
pub struct AnnotatedMatrix {
    backing: Backing,
    parts: Components,
}

impl AnnotatedMatrix {
    /// An Owned container over `x` with positional axis names and no
    /// annotations.
    pub fn new(x: Array2<f32>) -> Self {
        let (n_obs, n_vars) = x.dim();
        Self::from_parts(Components {
            x: MatrixStore::new(x),
            obs: AxisTable::positional(Axis::Obs, n_obs),
            var: AxisTable::positional(Axis::Var, n_vars),
            obsm: MultiArrayMap::new(Axis::Obs, n_obs),
            varm: MultiArrayMap::new(Axis::Var, n_vars),
            uns: UnstructuredMap::new(),
        })
    }

    /// Caller guarantees the components are unshared and mutually aligned.
    pub(crate) fn from_parts(parts: Components) -> Self {
        Self {
            backing: Backing::Owned,
            parts,
        }
    }

    // ── indexing ────────────────────────────────────────────────

    /// Index the container, returning a View.
    ///
    /// `rows` and `cols` are resolved against this container's extents and
    /// names. Indexing a View composes the selections, so the result
    /// addresses the Owned ancestor directly.
    pub fn slice(
        &self,
        rows: impl Into<SelectorSpec>,
        cols: impl Into<SelectorSpec>,
    ) -> Result<AnnotatedMatrix, AnnError> {
        let rows = resolve_on(&self.parts.obs, rows.into())?;
        let cols = resolve_on(&self.parts.var, cols.into())?;
        let backing = match &self.backing {
            Backing::Owned => Backing::View {
                rows: rows.clone(),
                cols: cols.clone(),
            },
            Backing::View {
                rows: outer_rows,
                cols: outer_cols,
            } => Backing::View {
                rows: outer_rows.compose(&rows),
                cols: outer_cols.compose(&cols),
            },
        };
        Ok(Self {
            backing,
            parts: self.parts.create_view(&rows, &cols),
        })
    }

    // ── state ───────────────────────────────────────────────────

    /// Current state.
    pub fn state(&self) -> ContainerState {
        match self.backing {
            Backing::Owned => ContainerState::Owned,
            Backing::View { .. } => ContainerState::View,
        }
    }

    /// Whether this container aliases another's storage.
    pub fn is_view(&self) -> bool {
        self.state() == ContainerState::View
    }

    /// For a View, the absolute row and column positions into the Owned
    /// ancestor.
    pub fn view_selectors(&self) -> Option<(&Selection, &Selection)> {
        match &self.backing {
            Backing::Owned => None,
            Backing::View { rows, cols } => Some((rows, cols)),
        }
    }

    /// Convert a View into an Owned container in place.
    ///
    /// Returns `true` if anything was copied; calling it again (or on an
    /// Owned container) is a no-op returning `false`.
    pub fn materialize(&mut self) -> bool {
        ensure_owned(&mut self.backing, &mut self.parts)
    }

    /// A new Owned container holding copies of everything this one
    /// addresses. `self` is unchanged.
    pub fn to_owned_copy(&self) -> AnnotatedMatrix {
        Self::from_parts(self.parts.materialize())
    }

    // ── reads ───────────────────────────────────────────────────

    /// `(n_obs, n_vars)`.
    pub fn shape(&self) -> (usize, usize) {
        self.parts.x.shape()
    }

    /// Number of observations (rows).
    pub fn n_obs(&self) -> usize {
        self.parts.x.nrows()
    }

    /// Number of variables (columns).
    pub fn n_vars(&self) -> usize {
        self.parts.x.ncols()
    }

    /// The data matrix. Elementwise writes through it are write-through.
    pub fn x(&self) -> &MatrixStore {
        &self.parts.x
    }

    /// Observation annotations.
    pub fn obs(&self) -> &AxisTable {
        &self.parts.obs
    }

    /// Variable annotations.
    pub fn var(&self) -> &AxisTable {
        &self.parts.var
    }

    /// Annotation table for `axis`.
    pub fn annotations(&self, axis: Axis) -> &AxisTable {
        match axis {
            Axis::Obs => &self.parts.obs,
            Axis::Var => &self.parts.var,
        }
    }

    /// Observation-aligned multi-arrays.
    pub fn obsm(&self) -> &MultiArrayMap {
        &self.parts.obsm
    }

    /// Variable-aligned multi-arrays.
    pub fn varm(&self) -> &MultiArrayMap {
        &self.parts.varm
    }

    /// Multi-array map for `axis`.
    pub fn multi_array(&self, axis: Axis) -> &MultiArrayMap {
        match axis {
            Axis::Obs => &self.parts.obsm,
            Axis::Var => &self.parts.varm,
        }
    }

    /// Unstructured metadata.
    pub fn uns(&self) -> &UnstructuredMap {
        &self.parts.uns
    }

    /// Observation names in order.
    pub fn obs_names(&self) -> Vec<String> {
        self.parts.obs.names()
    }

    /// Variable names in order.
    pub fn var_names(&self) -> Vec<String> {
        self.parts.var.names()
    }

    fn annotations_mut(&mut self, axis: Axis) -> &mut AxisTable {
        match axis {
            Axis::Obs => &mut self.parts.obs,
            Axis::Var => &mut self.parts.var,
        }
    }

    fn multi_array_mut(&mut self, axis: Axis) -> &mut MultiArrayMap {
        match axis {
            Axis::Obs => &mut self.parts.obsm,
            Axis::Var => &mut self.parts.varm,
        }
    }

    // ── structural mutation ─────────────────────────────────────
    //
    // Each method checks its input against the target component, then
    // materializes a View, then applies the change.

    /// Replace `X` wholesale. The shape must not change.
    pub fn set_x(&mut self, x: Array2<f32>) -> Result<(), AnnError> {
        self.parts.x.check_replacement(&x)?;
        self.materialize();
        self.parts.x.replace_whole(x)
    }

    /// Replace the names and columns of one axis table.
    pub fn set_annotations(&mut self, axis: Axis, annotations: Annotations) -> Result<(), AnnError> {
        self.annotations(axis).check_annotations(&annotations)?;
        self.materialize();
        self.annotations_mut(axis).replace_all(annotations)
    }

    /// Insert or replace one column of an axis table.
    pub fn set_column(
        &mut self,
        axis: Axis,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<(), AnnError> {
        let name = name.into();
        let column = column.into();
        self.annotations(axis).check_column(&name, &column)?;
        self.materialize();
        self.annotations_mut(axis).set_column(name, column)
    }

    /// Remove one column of an axis table.
    pub fn remove_column(&mut self, axis: Axis, name: &str) -> Result<Column, AnnError> {
        self.annotations(axis).check_remove(name)?;
        self.materialize();
        self.annotations_mut(axis).remove_column(name)
    }

    /// Replace the names of one axis.
    pub fn set_names<I, S>(&mut self, axis: Axis, names: I) -> Result<(), AnnError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.annotations(axis).check_names(&names)?;
        self.materialize();
        self.annotations_mut(axis).set_names(names)
    }

    /// Replace every entry of one multi-array map.
    pub fn set_multi_array(&mut self, axis: Axis, map: ArrayMap) -> Result<(), AnnError> {
        self.multi_array(axis).check_entire_map(&map)?;
        self.materialize();
        self.multi_array_mut(axis).set_entire_map(map)
    }

    /// Insert or replace one entry of a multi-array map.
    pub fn set_multi_array_entry(
        &mut self,
        axis: Axis,
        key: impl Into<String>,
        value: Array2<f32>,
    ) -> Result<(), AnnError> {
        let key = key.into();
        self.multi_array(axis).check_entry(&key, &value)?;
        self.materialize();
        self.multi_array_mut(axis).set_entry(key, value)
    }

    /// Remove one entry of a multi-array map.
    pub fn remove_multi_array_entry(&mut self, axis: Axis, key: &str) -> Result<Array2<f32>, AnnError> {
        self.multi_array(axis).check_remove(key)?;
        self.materialize();
        self.multi_array_mut(axis).remove_entry(key)
    }

    /// Replace the whole unstructured map.
    pub fn set_uns(&mut self, map: ValueMap) {
        self.materialize();
        self.parts.uns.replace_all(map);
    }

    /// Insert or replace one unstructured entry.
    pub fn set_uns_entry(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.materialize();
        self.parts.uns.set(key.into(), value.into());
    }

    /// Remove one unstructured entry.
    pub fn remove_uns_entry(&mut self, key: &str) -> Result<Value, AnnError> {
        self.parts.uns.check_remove(key)?;
        self.materialize();
        self.parts.uns.remove(key)
    }

    // ── named wrappers ──────────────────────────────────────────

    /// [`set_annotations`](Self::set_annotations) on `obs`.
    pub fn set_obs(&mut self, annotations: Annotations) -> Result<(), AnnError> {
        self.set_annotations(Axis::Obs, annotations)
    }

    /// [`set_annotations`](Self::set_annotations) on `var`.
    pub fn set_var(&mut self, annotations: Annotations) -> Result<(), AnnError> {
        self.set_annotations(Axis::Var, annotations)
    }

    /// [`set_column`](Self::set_column) on `obs`.
    pub fn set_obs_column(
        &mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<(), AnnError> {
        self.set_column(Axis::Obs, name, column)
    }

    /// [`set_column`](Self::set_column) on `var`.
    pub fn set_var_column(
        &mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<(), AnnError> {
        self.set_column(Axis::Var, name, column)
    }

    /// [`remove_column`](Self::remove_column) on `obs`.
    pub fn remove_obs_column(&mut self, name: &str) -> Result<Column, AnnError> {
        self.remove_column(Axis::Obs, name)
    }

    /// [`remove_column`](Self::remove_column) on `var`.
    pub fn remove_var_column(&mut self, name: &str) -> Result<Column, AnnError> {
        self.remove_column(Axis::Var, name)
    }

    /// [`set_names`](Self::set_names) on `obs`.
    pub fn set_obs_names<I, S>(&mut self, names: I) -> Result<(), AnnError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_names(Axis::Obs, names)
    }

    /// [`set_names`](Self::set_names) on `var`.
    pub fn set_var_names<I, S>(&mut self, names: I) -> Result<(), AnnError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_names(Axis::Var, names)
    }

    /// [`set_multi_array`](Self::set_multi_array) on `obsm`.
    pub fn set_obsm(&mut self, map: ArrayMap) -> Result<(), AnnError> {
        self.set_multi_array(Axis::Obs, map)
    }

    /// [`set_multi_array`](Self::set_multi_array) on `varm`.
    pub fn set_varm(&mut self, map: ArrayMap) -> Result<(), AnnError> {
        self.set_multi_array(Axis::Var, map)
    }

    /// [`set_multi_array_entry`](Self::set_multi_array_entry) on `obsm`.
    pub fn set_obsm_entry(&mut self, key: impl Into<String>, value: Array2<f32>) -> Result<(), AnnError> {
        self.set_multi_array_entry(Axis::Obs, key, value)
    }

    /// [`set_multi_array_entry`](Self::set_multi_array_entry) on `varm`.
    pub fn set_varm_entry(&mut self, key: impl Into<String>, value: Array2<f32>) -> Result<(), AnnError> {
        self.set_multi_array_entry(Axis::Var, key, value)
    }

    /// [`remove_multi_array_entry`](Self::remove_multi_array_entry) on `obsm`.
    pub fn remove_obsm_entry(&mut self, key: &str) -> Result<Array2<f32>, AnnError> {
        self.remove_multi_array_entry(Axis::Obs, key)
    }

    /// [`remove_multi_array_entry`](Self::remove_multi_array_entry) on `varm`.
    pub fn remove_varm_entry(&mut self, key: &str) -> Result<Array2<f32>, AnnError> {
        self.remove_multi_array_entry(Axis::Var, key)
    }
}

/// Resolve `spec` against the visible positions and names of `table`.
fn resolve_on(table: &AxisTable, spec: SelectorSpec) -> Result<Selection, AnnError> {
    match spec {
        SelectorSpec::Names(_) => {
            let index = table.position_index();
            spec.resolve(table.axis(), table.len(), |name| index.get(name).copied())
        }
        _ => spec.resolve(table.axis(), table.len(), |name| table.position(name)),
    }
}

impl fmt::Display for AnnotatedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_view() {
            f.write_str("View of ")?;
        }
        write!(
            f,
            "AnnotatedMatrix object with n_obs × n_vars = {} × {}",
            self.n_obs(),
            self.n_vars()
        )?;
        let sections = [
            ("obs", self.parts.obs.column_names()),
            ("var", self.parts.var.column_names()),
            ("uns", self.parts.uns.keys()),
            ("obsm", self.parts.obsm.keys()),
            ("varm", self.parts.varm.keys()),
        ];
        for (label, keys) in sections {
            if keys.is_empty() {
                continue;
            }
            let quoted: Vec<String> = keys.iter().map(|k| format!("'{k}'")).collect();
            write!(f, "\n    {label}: {}", quoted.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small() -> AnnotatedMatrix {
        let mut m = AnnotatedMatrix::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        m.set_obs_names(["a", "b", "c"]).unwrap();
        m.set_var_names(["g1", "g2", "g3"]).unwrap();
        m
    }

    #[test]
    fn new_uses_positional_names() {
        let m = AnnotatedMatrix::new(Array2::zeros((2, 3)));
        assert_eq!(m.obs_names(), ["0", "1"]);
        assert_eq!(m.var_names(), ["0", "1", "2"]);
        assert!(!m.is_view());
        assert!(m.view_selectors().is_none());
    }

    #[test]
    fn slice_by_names_resolves_within_view() {
        let root = small();
        let view = root.slice(["c", "a"], ..).unwrap();
        assert_eq!(view.obs_names(), ["c", "a"]);
        // "a" is position 1 of the view, position 0 of the root.
        let inner = view.slice(["a"], ["g2"]).unwrap();
        assert_eq!(inner.x().get(0, 0), Some(2.0));
        let (rows, cols) = inner.view_selectors().unwrap();
        assert_eq!(rows.to_vec(), [0]);
        assert_eq!(cols.to_vec(), [1]);
    }

    #[test]
    fn slice_rejects_hidden_names() {
        let root = small();
        let view = root.slice(0..2usize, ..).unwrap();
        assert_eq!(
            view.slice(["c"], ..).unwrap_err(),
            AnnError::key_not_found("obs_names", "c")
        );
    }

    #[test]
    fn set_x_on_view_materializes_and_detaches() {
        let root = small();
        let mut view = root.slice(0..2usize, 0usize).unwrap();
        view.set_x(array![[10.0], [20.0]]).unwrap();
        assert!(!view.is_view());
        assert_eq!(root.x().get(0, 0), Some(1.0));
        assert_eq!(view.x().to_array(), array![[10.0], [20.0]]);
    }

    #[test]
    fn failed_validation_keeps_view() {
        let root = small();
        let mut view = root.slice(.., [0usize, 2]).unwrap();
        assert!(view.set_var_column("bad", vec![1i64]).is_err());
        assert!(view.is_view());
        assert!(view.remove_obsm_entry("missing").is_err());
        assert!(view.is_view());
    }

    #[test]
    fn uns_writes_on_view_do_not_reach_root() {
        let mut root = small();
        root.set_uns_entry("colors", vec!["#000000", "#FFFFFF"]);
        let mut view = root.slice(0usize, ..).unwrap();
        assert_eq!(view.uns().keys(), ["colors"]);
        view.set_uns_entry("extra", 1i64);
        assert!(!view.is_view());
        assert!(!root.uns().contains_key("extra"));
        assert!(view.uns().contains_key("colors"));
    }

    #[test]
    fn to_owned_copy_leaves_view_alone() {
        let root = small();
        let view = root.slice(1..3usize, ..).unwrap();
        let copy = view.to_owned_copy();
        assert!(view.is_view());
        assert!(!copy.is_view());
        assert!(!copy.x().shares_buffer(root.x()));
        assert_eq!(copy.obs_names(), ["b", "c"]);
    }

    #[test]
    fn display_lists_keys() {
        let mut root = small();
        root.set_obs_column("kind", Column::categorical(["x", "y", "x"])).unwrap();
        root.set_obsm_entry("pca", Array2::zeros((3, 2))).unwrap();
        let view = root.slice(0usize, ..).unwrap();
        assert_eq!(
            view.to_string(),
            "View of AnnotatedMatrix object with n_obs × n_vars = 1 × 3\n    obs: 'kind'\n    obsm: 'pca'"
        );
        assert!(root.to_string().starts_with("AnnotatedMatrix object with n_obs × n_vars = 3 × 3"));
    }
}

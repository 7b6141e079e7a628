//! Shared 2-D matrix storage with write-through views.
//!
//! [`MatrixStore`] is a handle onto a reference-counted `Array2<f32>` plus
//! the row and column [`Selection`]s that address the region this handle
//! sees. Creating a view clones the handle and composes the selections; no
//! element storage is allocated. Elementwise writes always land in the
//! shared buffer, so they are visible through every alias, including the
//! owning container.

use std::cell::RefCell;
use std::rc::Rc;

use annomat_core::{AnnError, Axis, Selection};
use ndarray::{Array2, ArrayView2, Axis as NdAxis};

/// Handle onto a (possibly shared) matrix buffer and the region it addresses.
#[derive(Debug)]
pub struct MatrixStore {
    buffer: Rc<RefCell<Array2<f32>>>,
    rows: Selection,
    cols: Selection,
}

impl MatrixStore {
    /// Take ownership of `data` as a fresh, unshared buffer.
    pub fn new(data: Array2<f32>) -> Self {
        let (rows, cols) = data.dim();
        Self {
            buffer: Rc::new(RefCell::new(data)),
            rows: Selection::full(rows),
            cols: Selection::full(cols),
        }
    }

    /// `(rows, cols)` of the addressed region.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// Number of addressed rows.
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Number of addressed columns.
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// A handle onto the `rows` × `cols` sub-region of this one.
    ///
    /// The selections are relative to this handle; the result addresses the
    /// same buffer.
    pub fn create_view(&self, rows: &Selection, cols: &Selection) -> Self {
        Self {
            buffer: Rc::clone(&self.buffer),
            rows: self.rows.compose(rows),
            cols: self.cols.compose(cols),
        }
    }

    /// Read element `(i, j)` of the addressed region.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        let r = self.rows.get(i)?;
        let c = self.cols.get(j)?;
        self.buffer.borrow().get((r, c)).copied()
    }

    /// Write element `(i, j)` of the addressed region into the shared buffer.
    pub fn set(&self, i: usize, j: usize, value: f32) -> Result<(), AnnError> {
        let (r, c) = self.locate(i, j)?;
        self.buffer.borrow_mut()[[r, c]] = value;
        Ok(())
    }

    /// Write `values` over the whole addressed region, element by element.
    ///
    /// `values` must have exactly this handle's shape. Like [`set`](Self::set),
    /// the write goes to the shared buffer.
    pub fn assign(&self, values: ArrayView2<'_, f32>) -> Result<(), AnnError> {
        self.check_shape("X", values.dim())?;
        let mut buf = self.buffer.borrow_mut();
        for (i, r) in self.rows.iter().enumerate() {
            for (j, c) in self.cols.iter().enumerate() {
                buf[[r, c]] = values[[i, j]];
            }
        }
        Ok(())
    }

    /// Copy the addressed region into a new array.
    pub fn to_array(&self) -> Array2<f32> {
        let buf = self.buffer.borrow();
        match (self.rows.is_full(), self.cols.is_full()) {
            (true, true) => buf.clone(),
            (false, true) => buf.select(NdAxis(0), &self.rows.to_vec()),
            (true, false) => buf.select(NdAxis(1), &self.cols.to_vec()),
            (false, false) => buf
                .select(NdAxis(0), &self.rows.to_vec())
                .select(NdAxis(1), &self.cols.to_vec()),
        }
    }

    /// Check that `new` could replace the addressed region.
    pub fn check_replacement(&self, new: &Array2<f32>) -> Result<(), AnnError> {
        self.check_shape("X", new.dim())
    }

    /// Replace the addressed region with `new`.
    ///
    /// Fails with [`AnnError::Shape`] and leaves the store untouched unless
    /// `new` has exactly this handle's shape. The store does not know whether
    /// its container is a view: callers that must not write through to other
    /// aliases materialize first.
    pub(crate) fn replace_whole(&mut self, new: Array2<f32>) -> Result<(), AnnError> {
        self.check_replacement(&new)?;
        if self.rows.is_full() && self.cols.is_full() {
            *self.buffer.borrow_mut() = new;
            Ok(())
        } else {
            self.assign(new.view())
        }
    }

    /// Copy the addressed region into a fresh buffer owned by the result.
    pub fn materialize(&self) -> Self {
        Self::new(self.to_array())
    }

    /// Whether both handles address the same underlying buffer.
    pub fn shares_buffer(&self, other: &MatrixStore) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    fn locate(&self, i: usize, j: usize) -> Result<(usize, usize), AnnError> {
        let r = self.rows.get(i).ok_or(AnnError::IndexOutOfBounds {
            axis: Axis::Obs,
            index: i,
            extent: self.nrows(),
        })?;
        let c = self.cols.get(j).ok_or(AnnError::IndexOutOfBounds {
            axis: Axis::Var,
            index: j,
            extent: self.ncols(),
        })?;
        Ok((r, c))
    }

    fn check_shape(&self, target: &str, (rows, cols): (usize, usize)) -> Result<(), AnnError> {
        if (rows, cols) != self.shape() {
            return Err(AnnError::Shape {
                target: target.to_owned(),
                expected_rows: self.nrows(),
                expected_cols: Some(self.ncols()),
                found_rows: rows,
                found_cols: cols,
            });
        }
        Ok(())
    }
}

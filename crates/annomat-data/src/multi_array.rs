//! Multi-array maps (`obsm` and `varm`).
//!
//! Each entry is a 2-D array whose leading dimension equals the extent of
//! the map's axis; the trailing dimension is free per entry. A view handle
//! presents every entry row-selected by its [`Selection`].

use std::cell::RefCell;
use std::rc::Rc;

use annomat_core::{AnnError, Axis, Selection};
use indexmap::IndexMap;
use ndarray::{Array2, Axis as NdAxis};

/// Key-to-array map input, in insertion order.
pub type ArrayMap = IndexMap<String, Array2<f32>>;

/// Check that `value` could be stored under `key` in a map over `extent`
/// positions of `axis`.
pub(crate) fn validate_entry(
    axis: Axis,
    extent: usize,
    key: &str,
    value: &Array2<f32>,
) -> Result<(), AnnError> {
    let (rows, cols) = value.dim();
    if rows != extent {
        return Err(AnnError::Shape {
            target: format!("{}['{key}']", axis.multi_array_name()),
            expected_rows: extent,
            expected_cols: None,
            found_rows: rows,
            found_cols: cols,
        });
    }
    Ok(())
}

/// Check every entry of `map`; stops at the first offender.
pub(crate) fn validate_map(axis: Axis, extent: usize, map: &ArrayMap) -> Result<(), AnnError> {
    map.iter()
        .try_for_each(|(key, value)| validate_entry(axis, extent, key, value))
}

/// Handle onto a (possibly shared) multi-array map for one axis.
#[derive(Debug)]
pub struct MultiArrayMap {
    axis: Axis,
    entries: Rc<RefCell<ArrayMap>>,
    rows: Selection,
}

impl MultiArrayMap {
    /// An empty owned map over `extent` positions.
    pub fn new(axis: Axis, extent: usize) -> Self {
        Self {
            axis,
            entries: Rc::new(RefCell::new(IndexMap::new())),
            rows: Selection::full(extent),
        }
    }

    /// An owned map holding `entries`, each checked against `extent`.
    pub fn from_entries(axis: Axis, extent: usize, entries: ArrayMap) -> Result<Self, AnnError> {
        validate_map(axis, extent, &entries)?;
        Ok(Self {
            axis,
            entries: Rc::new(RefCell::new(entries)),
            rows: Selection::full(extent),
        })
    }

    /// The axis whose positions index each entry's leading dimension.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of visible axis positions (each entry's leading dimension).
    pub fn extent(&self) -> usize {
        self.rows.len()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Entry keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Copy of entry `key`, row-selected to the visible positions.
    pub fn get(&self, key: &str) -> Result<Array2<f32>, AnnError> {
        let entries = self.entries.borrow();
        let value = entries
            .get(key)
            .ok_or_else(|| AnnError::key_not_found(self.axis.multi_array_name(), key))?;
        if self.rows.is_full() {
            Ok(value.clone())
        } else {
            Ok(value.select(NdAxis(0), &self.rows.to_vec()))
        }
    }

    /// Visible shape of entry `key`.
    pub fn entry_shape(&self, key: &str) -> Result<(usize, usize), AnnError> {
        let entries = self.entries.borrow();
        let value = entries
            .get(key)
            .ok_or_else(|| AnnError::key_not_found(self.axis.multi_array_name(), key))?;
        Ok((self.extent(), value.ncols()))
    }

    /// Copy every entry out, row-selected.
    pub fn to_map(&self) -> ArrayMap {
        let entries = self.entries.borrow();
        let rows = (!self.rows.is_full()).then(|| self.rows.to_vec());
        entries
            .iter()
            .map(|(k, v)| {
                let value = match &rows {
                    Some(rows) => v.select(NdAxis(0), rows),
                    None => v.clone(),
                };
                (k.clone(), value)
            })
            .collect()
    }

    /// A handle presenting `selection` (relative to this handle) of every
    /// entry.
    pub fn create_view(&self, selection: &Selection) -> Self {
        Self {
            axis: self.axis,
            entries: Rc::clone(&self.entries),
            rows: self.rows.compose(selection),
        }
    }

    /// Check that `value` could be stored under `key`.
    pub fn check_entry(&self, key: &str, value: &Array2<f32>) -> Result<(), AnnError> {
        validate_entry(self.axis, self.extent(), key, value)
    }

    /// Check that every entry of `map` could be stored.
    pub fn check_entire_map(&self, map: &ArrayMap) -> Result<(), AnnError> {
        validate_map(self.axis, self.extent(), map)
    }

    /// Replace every entry at once. Nothing changes unless all of `map` is
    /// valid.
    pub(crate) fn set_entire_map(&mut self, map: ArrayMap) -> Result<(), AnnError> {
        self.check_entire_map(&map)?;
        self.debug_assert_owned();
        *self.entries.borrow_mut() = map;
        Ok(())
    }

    /// Insert or replace one entry.
    pub(crate) fn set_entry(&mut self, key: String, value: Array2<f32>) -> Result<(), AnnError> {
        self.check_entry(&key, &value)?;
        self.debug_assert_owned();
        self.entries.borrow_mut().insert(key, value);
        Ok(())
    }

    /// Check that `key` is present.
    pub fn check_remove(&self, key: &str) -> Result<(), AnnError> {
        if !self.contains_key(key) {
            return Err(AnnError::key_not_found(self.axis.multi_array_name(), key));
        }
        Ok(())
    }

    /// Remove entry `key`, keeping the order of the others.
    pub(crate) fn remove_entry(&mut self, key: &str) -> Result<Array2<f32>, AnnError> {
        self.debug_assert_owned();
        self.entries
            .borrow_mut()
            .shift_remove(key)
            .ok_or_else(|| AnnError::key_not_found(self.axis.multi_array_name(), key))
    }

    /// Copy every entry's visible rows into fresh storage owned by the
    /// result.
    pub fn materialize(&self) -> Self {
        Self {
            axis: self.axis,
            entries: Rc::new(RefCell::new(self.to_map())),
            rows: Selection::full(self.extent()),
        }
    }

    /// Whether both handles address the same storage.
    pub fn shares_storage(&self, other: &MultiArrayMap) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    fn debug_assert_owned(&self) {
        debug_assert!(
            self.rows.is_full(),
            "structural write to a multi-array view; materialize first"
        );
    }
}

//! Axis annotation tables (`obs` and `var`).
//!
//! An [`AxisTable`] holds the unique names of one axis and any number of
//! typed [`Column`]s, each with one value per axis position. Like
//! [`MatrixStore`](crate::MatrixStore), a table is a handle onto shared
//! storage plus a [`Selection`]; views present the selected positions in
//! selection order without copying.

use std::cell::RefCell;
use std::rc::Rc;

use annomat_core::{AnnError, Axis, Column, Scalar, Selection};
use indexmap::{IndexMap, IndexSet};

/// Owned input for an axis table: names plus columns.
///
/// Nothing is checked on construction. The table that consumes the
/// annotations validates names and column lengths against its axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    /// Axis names, one per position.
    pub names: Vec<String>,
    /// Columns in insertion order.
    pub columns: IndexMap<String, Column>,
}

impl Annotations {
    /// Annotations with the given names and no columns.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            columns: IndexMap::new(),
        }
    }

    /// Names `"0"`, `"1"`, … for `len` positions.
    pub fn positional(len: usize) -> Self {
        Self::new((0..len).map(|i| i.to_string()))
    }

    /// Add (or replace) a column.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.columns.insert(name.into(), column.into());
        self
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no positions.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Check that `annotations` form a valid table for `axis` with `expected`
/// positions: right length, unique names, every column full length.
pub(crate) fn validate_annotations(
    axis: Axis,
    annotations: &Annotations,
    expected: usize,
) -> Result<(), AnnError> {
    if annotations.len() != expected {
        return Err(AnnError::Length {
            target: axis.table_name().to_owned(),
            expected,
            found: annotations.len(),
        });
    }
    check_unique_names(axis, &annotations.names)?;
    for (name, column) in &annotations.columns {
        check_column_len(axis, name, column, expected)?;
    }
    Ok(())
}

fn check_unique_names(axis: Axis, names: &[String]) -> Result<(), AnnError> {
    let mut seen = IndexSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(AnnError::DuplicateName {
                axis,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn check_column_len(axis: Axis, name: &str, column: &Column, expected: usize) -> Result<(), AnnError> {
    if column.len() != expected {
        return Err(AnnError::Length {
            target: format!("{}['{name}']", axis.table_name()),
            expected,
            found: column.len(),
        });
    }
    Ok(())
}

#[derive(Debug)]
struct TableData {
    names: IndexSet<String>,
    columns: IndexMap<String, Column>,
}

impl TableData {
    /// Caller has validated `annotations`.
    fn from_annotations(annotations: Annotations) -> Self {
        Self {
            names: annotations.names.into_iter().collect(),
            columns: annotations.columns,
        }
    }
}

/// Handle onto a (possibly shared) annotation table for one axis.
#[derive(Debug)]
pub struct AxisTable {
    axis: Axis,
    data: Rc<RefCell<TableData>>,
    rows: Selection,
}

impl AxisTable {
    /// Build an owned table from validated-on-entry annotations.
    pub fn from_annotations(axis: Axis, annotations: Annotations) -> Result<Self, AnnError> {
        let len = annotations.len();
        validate_annotations(axis, &annotations, len)?;
        Ok(Self {
            axis,
            data: Rc::new(RefCell::new(TableData::from_annotations(annotations))),
            rows: Selection::full(len),
        })
    }

    /// A table with positional names and no columns.
    pub fn positional(axis: Axis, len: usize) -> Self {
        Self {
            axis,
            data: Rc::new(RefCell::new(TableData::from_annotations(
                Annotations::positional(len),
            ))),
            rows: Selection::full(len),
        }
    }

    /// The axis this table annotates.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of visible positions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no positions are visible.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A handle presenting `selection` (relative to this handle) of the
    /// same storage.
    pub fn create_view(&self, selection: &Selection) -> Self {
        Self {
            axis: self.axis,
            data: Rc::clone(&self.data),
            rows: self.rows.compose(selection),
        }
    }

    /// Visible names in order.
    pub fn names(&self) -> Vec<String> {
        let data = self.data.borrow();
        self.rows
            .iter()
            .map(|p| data.names[p].clone())
            .collect()
    }

    /// Name at visible position `i`.
    pub fn name(&self, i: usize) -> Option<String> {
        let p = self.rows.get(i)?;
        self.data.borrow().names.get_index(p).cloned()
    }

    /// Visible position of `name`, if it is visible in this handle.
    pub fn position(&self, name: &str) -> Option<usize> {
        let absolute = self.data.borrow().names.get_index_of(name)?;
        self.rows.position_of(absolute)
    }

    /// Visible name to visible position, built in one pass.
    ///
    /// [`position`](Self::position) scans a view's selection per call; use
    /// this when resolving many names against the same handle.
    pub fn position_index(&self) -> IndexMap<String, usize> {
        let data = self.data.borrow();
        self.rows
            .iter()
            .enumerate()
            .map(|(i, p)| (data.names[p].clone(), i))
            .collect()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<String> {
        self.data.borrow().columns.keys().cloned().collect()
    }

    /// Whether a column named `name` exists.
    pub fn contains_column(&self, name: &str) -> bool {
        self.data.borrow().columns.contains_key(name)
    }

    /// Copy of the visible values of column `name`.
    pub fn column(&self, name: &str) -> Result<Column, AnnError> {
        self.data
            .borrow()
            .columns
            .get(name)
            .map(|c| c.select(&self.rows))
            .ok_or_else(|| AnnError::key_not_found(self.axis.table_name(), name))
    }

    /// Value of column `name` at visible position `i`.
    pub fn value(&self, name: &str, i: usize) -> Result<Scalar, AnnError> {
        let p = self.rows.get(i).ok_or(AnnError::IndexOutOfBounds {
            axis: self.axis,
            index: i,
            extent: self.len(),
        })?;
        let data = self.data.borrow();
        let column = data
            .columns
            .get(name)
            .ok_or_else(|| AnnError::key_not_found(self.axis.table_name(), name))?;
        // `p` is in range: every stored column spans the stored axis.
        column
            .get(p)
            .ok_or_else(|| AnnError::key_not_found(self.axis.table_name(), name))
    }

    /// Copy the visible table out as [`Annotations`].
    pub fn to_annotations(&self) -> Annotations {
        let data = self.data.borrow();
        Annotations {
            names: self.rows.iter().map(|p| data.names[p].clone()).collect(),
            columns: data
                .columns
                .iter()
                .map(|(k, c)| (k.clone(), c.select(&self.rows)))
                .collect(),
        }
    }

    /// Check that `column` could be stored as `name`.
    pub fn check_column(&self, name: &str, column: &Column) -> Result<(), AnnError> {
        check_column_len(self.axis, name, column, self.len())
    }

    /// Insert or replace column `name`.
    pub(crate) fn set_column(&mut self, name: String, column: Column) -> Result<(), AnnError> {
        self.check_column(&name, &column)?;
        self.debug_assert_owned();
        self.data.borrow_mut().columns.insert(name, column);
        Ok(())
    }

    /// Check that column `name` exists.
    pub fn check_remove(&self, name: &str) -> Result<(), AnnError> {
        if !self.contains_column(name) {
            return Err(AnnError::key_not_found(self.axis.table_name(), name));
        }
        Ok(())
    }

    /// Remove column `name`, keeping the order of the others.
    pub(crate) fn remove_column(&mut self, name: &str) -> Result<Column, AnnError> {
        self.check_remove(name)?;
        self.debug_assert_owned();
        self.data
            .borrow_mut()
            .columns
            .shift_remove(name)
            .ok_or_else(|| AnnError::key_not_found(self.axis.table_name(), name))
    }

    /// Check that `names` could replace the axis names.
    pub fn check_names(&self, names: &[String]) -> Result<(), AnnError> {
        if names.len() != self.len() {
            return Err(AnnError::Length {
                target: self.axis.names_name().to_owned(),
                expected: self.len(),
                found: names.len(),
            });
        }
        check_unique_names(self.axis, names)
    }

    /// Replace the axis names.
    pub(crate) fn set_names(&mut self, names: Vec<String>) -> Result<(), AnnError> {
        self.check_names(&names)?;
        self.debug_assert_owned();
        self.data.borrow_mut().names = names.into_iter().collect();
        Ok(())
    }

    /// Check that `annotations` could replace the whole table.
    pub fn check_annotations(&self, annotations: &Annotations) -> Result<(), AnnError> {
        validate_annotations(self.axis, annotations, self.len())
    }

    /// Replace names and columns wholesale.
    pub(crate) fn replace_all(&mut self, annotations: Annotations) -> Result<(), AnnError> {
        self.check_annotations(&annotations)?;
        self.debug_assert_owned();
        *self.data.borrow_mut() = TableData::from_annotations(annotations);
        Ok(())
    }

    /// Copy the visible names and every column's visible values into fresh
    /// storage owned by the result.
    pub fn materialize(&self) -> Self {
        let len = self.len();
        Self {
            axis: self.axis,
            data: Rc::new(RefCell::new(TableData::from_annotations(
                self.to_annotations(),
            ))),
            rows: Selection::full(len),
        }
    }

    /// Whether both handles address the same storage.
    pub fn shares_storage(&self, other: &AxisTable) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    fn debug_assert_owned(&self) {
        debug_assert!(
            self.rows.is_full(),
            "structural write to a table view; materialize first"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs_table() -> AxisTable {
        let ann = Annotations::new(["name1", "name2", "name3"])
            .with_column("oanno1", Column::categorical(["cat1", "cat2", "cat2"]))
            .with_column("oanno3", vec![2.1f64, 2.2, 2.3]);
        AxisTable::from_annotations(Axis::Obs, ann).unwrap()
    }

    #[test]
    fn position_index_matches_position() {
        let table = obs_table();
        let view = table.create_view(&Selection::from_positions(vec![2, 0], 3));
        let index = view.position_index();
        assert_eq!(index.len(), 2);
        for name in ["name1", "name2", "name3"] {
            assert_eq!(index.get(name).copied(), view.position(name));
        }
        assert_eq!(index.keys().collect::<Vec<_>>(), ["name3", "name1"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = AxisTable::from_annotations(Axis::Var, Annotations::new(["a", "b", "a"]))
            .unwrap_err();
        assert_eq!(
            err,
            AnnError::DuplicateName {
                axis: Axis::Var,
                name: "a".into()
            }
        );
    }

    #[test]
    fn short_column_rejected() {
        let ann = Annotations::new(["a", "b"]).with_column("x", vec![1i64]);
        assert!(matches!(
            AxisTable::from_annotations(Axis::Obs, ann),
            Err(AnnError::Length { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn view_presents_selected_rows() {
        let table = obs_table();
        let view = table.create_view(&Selection::from_positions(vec![2, 0], 3));
        assert_eq!(view.names(), ["name3", "name1"]);
        assert_eq!(view.column("oanno3").unwrap(), Column::Float(vec![2.3, 2.1]));
        assert_eq!(view.value("oanno1", 0).unwrap(), Scalar::Text("cat2".into()));
        assert_eq!(view.position("name1"), Some(1));
        assert_eq!(view.position("name2"), None);
        assert!(view.shares_storage(&table));
    }

    #[test]
    fn set_column_checks_length_first() {
        let mut table = obs_table();
        let err = table.set_column("foo".into(), Column::from(0..2i64)).unwrap_err();
        assert!(matches!(err, AnnError::Length { expected: 3, found: 2, .. }));
        assert!(!table.contains_column("foo"));
        table.set_column("foo".into(), Column::from(0..3i64)).unwrap();
        assert_eq!(table.column_names(), ["oanno1", "oanno3", "foo"]);
    }

    #[test]
    fn missing_column_is_key_not_found() {
        let table = obs_table();
        assert_eq!(
            table.column("nope"),
            Err(AnnError::key_not_found("obs", "nope"))
        );
    }

    #[test]
    fn remove_keeps_column_order() {
        let mut table = obs_table();
        table.set_column("z".into(), Column::from(vec![true, false, true])).unwrap();
        table.remove_column("oanno3").unwrap();
        assert_eq!(table.column_names(), ["oanno1", "z"]);
        assert!(table.remove_column("oanno3").is_err());
    }

    #[test]
    fn set_names_checks_length_and_uniqueness() {
        let mut table = obs_table();
        let two = vec!["a".to_owned(), "b".to_owned()];
        assert!(matches!(table.set_names(two), Err(AnnError::Length { .. })));
        let dup = vec!["a".to_owned(), "b".to_owned(), "a".to_owned()];
        assert!(matches!(table.set_names(dup), Err(AnnError::DuplicateName { .. })));
        assert_eq!(table.names(), ["name1", "name2", "name3"]);
    }

    #[test]
    fn materialize_detaches() {
        let table = obs_table();
        let view = table.create_view(&Selection::from_positions(vec![1], 3));
        let mut owned = view.materialize();
        assert!(!owned.shares_storage(&table));
        owned.set_column("new".into(), Column::from(vec![1i64])).unwrap();
        assert!(!table.contains_column("new"));
        assert_eq!(owned.names(), ["name2"]);
    }
}

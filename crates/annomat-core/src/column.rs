//! Typed scalar columns for axis annotation tables.
//!
//! A column's value type is fixed by its [`Column`] variant. Replacing a
//! column may change its type; writing individual cells is not supported.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::select::Selection;

/// The value type of a [`Column`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit floats.
    Float,
    /// 64-bit signed integers.
    Int,
    /// Booleans.
    Bool,
    /// Free text.
    Text,
    /// Categorical labels with a fixed category list.
    Categorical,
}

/// A single cell read out of a [`Column`].
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Float cell.
    Float(f64),
    /// Integer cell.
    Int(i64),
    /// Boolean cell.
    Bool(bool),
    /// Text or categorical cell.
    Text(String),
}

/// Categorical labels: a sorted category list plus one code per row.
///
/// Selecting rows keeps the full category list, so a subset still knows
/// every category of its parent even when some no longer occur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Categorical {
    categories: Vec<String>,
    codes: Vec<u32>,
}

impl Categorical {
    /// Build from labels; categories are the sorted distinct labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let categories: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = labels
            .iter()
            .map(|l| {
                // Every label is in `categories` by construction.
                categories.binary_search(l).unwrap_or_default() as u32
            })
            .collect();
        Self { categories, codes }
    }

    /// The category list.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Per-row codes into [`categories`](Self::categories).
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Label of row `i`.
    pub fn label(&self, i: usize) -> Option<&str> {
        let code = *self.codes.get(i)? as usize;
        self.categories.get(code).map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn select(&self, selection: &Selection) -> Self {
        Self {
            categories: self.categories.clone(),
            codes: select_vec(&self.codes, selection),
        }
    }
}

/// One annotation column: a typed sequence with one value per axis position.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Float values.
    Float(Vec<f64>),
    /// Integer values.
    Int(Vec<i64>),
    /// Boolean values.
    Bool(Vec<bool>),
    /// Text values.
    Text(Vec<String>),
    /// Categorical labels.
    Categorical(Categorical),
}

impl Column {
    /// Categorical column from labels.
    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical(Categorical::from_labels(labels))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Categorical(c) => c.len(),
        }
    }

    /// Whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value type.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Float(_) => ColumnKind::Float,
            Self::Int(_) => ColumnKind::Int,
            Self::Bool(_) => ColumnKind::Bool,
            Self::Text(_) => ColumnKind::Text,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Value at position `i`. Categorical cells read as their label.
    pub fn get(&self, i: usize) -> Option<Scalar> {
        match self {
            Self::Float(v) => v.get(i).map(|&x| Scalar::Float(x)),
            Self::Int(v) => v.get(i).map(|&x| Scalar::Int(x)),
            Self::Bool(v) => v.get(i).map(|&x| Scalar::Bool(x)),
            Self::Text(v) => v.get(i).map(|s| Scalar::Text(s.clone())),
            Self::Categorical(c) => c.label(i).map(|s| Scalar::Text(s.to_owned())),
        }
    }

    /// Copy the selected positions into a new column of the same type.
    pub fn select(&self, selection: &Selection) -> Self {
        if selection.is_full() {
            return self.clone();
        }
        match self {
            Self::Float(v) => Self::Float(select_vec(v, selection)),
            Self::Int(v) => Self::Int(select_vec(v, selection)),
            Self::Bool(v) => Self::Bool(select_vec(v, selection)),
            Self::Text(v) => Self::Text(select_vec(v, selection)),
            Self::Categorical(c) => Self::Categorical(c.select(selection)),
        }
    }
}

fn select_vec<T: Clone>(values: &[T], selection: &Selection) -> Vec<T> {
    selection.iter().map(|p| values[p].clone()).collect()
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Self::Int(v)
    }
}

impl From<Range<i64>> for Column {
    fn from(r: Range<i64>) -> Self {
        Self::Int(r.collect())
    }
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Self::Text(v.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_sorts_categories() {
        let c = Categorical::from_labels(["cat2", "cat1", "cat2"]);
        assert_eq!(c.categories(), ["cat1", "cat2"]);
        assert_eq!(c.codes(), [1, 0, 1]);
        assert_eq!(c.label(0), Some("cat2"));
        assert_eq!(c.label(3), None);
    }

    #[test]
    fn select_keeps_type_and_order() {
        let col = Column::from(vec![2.1f64, 2.2, 2.3]);
        let sel = Selection::from_positions(vec![2, 0], 3);
        assert_eq!(col.select(&sel), Column::Float(vec![2.3, 2.1]));
    }

    #[test]
    fn categorical_select_keeps_all_categories() {
        let col = Column::categorical(["a", "b", "c"]);
        let sel = Selection::from_positions(vec![1], 3);
        let Column::Categorical(sub) = col.select(&sel) else {
            panic!("expected categorical");
        };
        assert_eq!(sub.categories(), ["a", "b", "c"]);
        assert_eq!(sub.label(0), Some("b"));
    }

    #[test]
    fn get_reads_categorical_as_text() {
        let col = Column::categorical(["x", "y"]);
        assert_eq!(col.get(1), Some(Scalar::Text("y".into())));
        assert_eq!(col.kind(), ColumnKind::Categorical);
    }

    #[test]
    fn range_builds_int_column() {
        assert_eq!(Column::from(0..3i64), Column::Int(vec![0, 1, 2]));
    }
}

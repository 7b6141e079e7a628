//! Axis selectors and their normalized form.
//!
//! A [`SelectorSpec`] is what a caller writes when indexing a container: a
//! range, positions, names, or a boolean mask. It is resolved once, against
//! the extent and names of the container being indexed, into a
//! [`Selection`]: an ordered sequence of absolute positions. Selections
//! compose, which is how chained indexing always addresses the owning
//! ancestor's storage directly.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::rc::Rc;

use crate::axis::Axis;
use crate::error::AnnError;

/// Specifies which positions of one axis to select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorSpec {
    /// Every position, in order.
    All,
    /// Contiguous half-open range `start..end`; `end == None` means the
    /// axis extent.
    Range {
        /// First position (inclusive).
        start: usize,
        /// One past the last position, or `None` for the axis extent.
        end: Option<usize>,
    },
    /// A single position. The axis is kept, with extent 1.
    Index(usize),
    /// Explicit positions, in the order given.
    Indices(Vec<usize>),
    /// Axis names, in the order given.
    Names(Vec<String>),
    /// Boolean mask; length must equal the axis extent.
    Mask(Vec<bool>),
}

impl SelectorSpec {
    /// Contiguous range `start..end`.
    pub fn range(start: usize, end: usize) -> Self {
        Self::Range {
            start,
            end: Some(end),
        }
    }

    /// Selection by axis names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    /// Normalize this selector into absolute positions along `axis`.
    ///
    /// `extent` is the length of the axis being indexed and `lookup` maps an
    /// axis name to its position on that axis. Positions may not repeat: a
    /// repeated position would duplicate an axis name in the result.
    pub fn resolve<F>(&self, axis: Axis, extent: usize, lookup: F) -> Result<Selection, AnnError>
    where
        F: Fn(&str) -> Option<usize>,
    {
        match self {
            Self::All => Ok(Selection::Full(extent)),

            Self::Range { start, end } => {
                let end = end.unwrap_or(extent);
                if end > extent {
                    return Err(AnnError::IndexOutOfBounds {
                        axis,
                        index: end,
                        extent,
                    });
                }
                if *start > end {
                    return Err(AnnError::InvalidSelector {
                        axis,
                        reason: format!("range start ({start}) > end ({end})"),
                    });
                }
                Ok(Selection::from_positions((*start..end).collect(), extent))
            }

            Self::Index(index) => {
                check_bounds(axis, *index, extent)?;
                Ok(Selection::from_positions(vec![*index], extent))
            }

            Self::Indices(indices) => {
                for &index in indices {
                    check_bounds(axis, index, extent)?;
                }
                check_unique(axis, indices, extent)?;
                Ok(Selection::from_positions(indices.clone(), extent))
            }

            Self::Names(names) => {
                let mut positions = Vec::with_capacity(names.len());
                for name in names {
                    let pos =
                        lookup(name).ok_or_else(|| AnnError::key_not_found(axis.names_name(), name))?;
                    positions.push(pos);
                }
                check_unique(axis, &positions, extent)?;
                Ok(Selection::from_positions(positions, extent))
            }

            Self::Mask(mask) => {
                if mask.len() != extent {
                    return Err(AnnError::Length {
                        target: format!("{axis} boolean mask"),
                        expected: extent,
                        found: mask.len(),
                    });
                }
                let positions = mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect();
                Ok(Selection::from_positions(positions, extent))
            }
        }
    }
}

fn check_bounds(axis: Axis, index: usize, extent: usize) -> Result<(), AnnError> {
    if index >= extent {
        return Err(AnnError::IndexOutOfBounds {
            axis,
            index,
            extent,
        });
    }
    Ok(())
}

/// Positions are already bounds-checked against `extent`.
fn check_unique(axis: Axis, positions: &[usize], extent: usize) -> Result<(), AnnError> {
    let mut seen = vec![false; extent];
    for &pos in positions {
        if std::mem::replace(&mut seen[pos], true) {
            return Err(AnnError::InvalidSelector {
                axis,
                reason: format!("position {pos} selected more than once"),
            });
        }
    }
    Ok(())
}

impl From<RangeFull> for SelectorSpec {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

impl From<Range<usize>> for SelectorSpec {
    fn from(r: Range<usize>) -> Self {
        Self::range(r.start, r.end)
    }
}

impl From<RangeTo<usize>> for SelectorSpec {
    fn from(r: RangeTo<usize>) -> Self {
        Self::range(0, r.end)
    }
}

impl From<RangeFrom<usize>> for SelectorSpec {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::Range {
            start: r.start,
            end: None,
        }
    }
}

impl From<usize> for SelectorSpec {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Vec<usize>> for SelectorSpec {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&[usize]> for SelectorSpec {
    fn from(indices: &[usize]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for SelectorSpec {
    fn from(indices: [usize; N]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl From<Vec<bool>> for SelectorSpec {
    fn from(mask: Vec<bool>) -> Self {
        Self::Mask(mask)
    }
}

impl From<&[bool]> for SelectorSpec {
    fn from(mask: &[bool]) -> Self {
        Self::Mask(mask.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for SelectorSpec {
    fn from(mask: [bool; N]) -> Self {
        Self::Mask(mask.to_vec())
    }
}

impl From<Vec<String>> for SelectorSpec {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for SelectorSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::names(names)
    }
}

impl From<&[&str]> for SelectorSpec {
    fn from(names: &[&str]) -> Self {
        Self::names(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for SelectorSpec {
    fn from(names: [&str; N]) -> Self {
        Self::names(names)
    }
}

/// Normalized selection: ordered absolute positions along one axis.
///
/// `Full(n)` is the identity over `n` positions and costs nothing to store;
/// explicit positions are reference-counted so cloning a selection (which
/// every view component does) never copies the position list.
#[derive(Clone, Debug)]
pub enum Selection {
    /// Positions `0..n`, in order.
    Full(usize),
    /// Explicit positions.
    Positions(Rc<[usize]>),
}

impl Selection {
    /// The identity selection over `len` positions.
    pub fn full(len: usize) -> Self {
        Self::Full(len)
    }

    /// Build a selection from explicit positions into an axis of `extent`.
    ///
    /// Collapses to [`Selection::Full`] when the positions are exactly
    /// `0..extent`.
    pub fn from_positions(positions: Vec<usize>, extent: usize) -> Self {
        if positions.len() == extent && positions.iter().enumerate().all(|(i, &p)| i == p) {
            Self::Full(extent)
        } else {
            Self::Positions(positions.into())
        }
    }

    /// Number of selected positions.
    pub fn len(&self) -> usize {
        match self {
            Self::Full(n) => *n,
            Self::Positions(p) => p.len(),
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is the identity selection.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Absolute position of the `i`-th selected element.
    #[inline]
    pub fn get(&self, i: usize) -> Option<usize> {
        match self {
            Self::Full(n) => (i < *n).then_some(i),
            Self::Positions(p) => p.get(i).copied(),
        }
    }

    /// Index within this selection of the absolute position `absolute`.
    ///
    /// Constant time for `Full`, a linear scan for explicit positions. For
    /// many lookups against one selection, build a reverse index instead.
    pub fn position_of(&self, absolute: usize) -> Option<usize> {
        match self {
            Self::Full(n) => (absolute < *n).then_some(absolute),
            Self::Positions(p) => p.iter().position(|&x| x == absolute),
        }
    }

    /// Iterate over the absolute positions in selection order.
    pub fn iter(&self) -> SelectionIter<'_> {
        SelectionIter {
            selection: self,
            next: 0,
        }
    }

    /// Copy the absolute positions into a `Vec`.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Select `inner` out of `self`.
    ///
    /// `inner` holds positions relative to this selection; the result holds
    /// the corresponding absolute positions, so `compose(a, b).get(i) ==
    /// a.get(b.get(i))`.
    pub fn compose(&self, inner: &Selection) -> Selection {
        match (self, inner) {
            (_, Self::Full(n)) => {
                debug_assert_eq!(*n, self.len(), "inner selection must span this selection");
                self.clone()
            }
            (Self::Full(_), Self::Positions(p)) => Self::Positions(Rc::clone(p)),
            (Self::Positions(outer), Self::Positions(p)) => {
                Self::Positions(p.iter().map(|&i| outer[i]).collect())
            }
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for Selection {}

/// Iterator over the absolute positions of a [`Selection`].
pub struct SelectionIter<'a> {
    selection: &'a Selection,
    next: usize,
}

impl Iterator for SelectionIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let pos = self.selection.get(self.next)?;
        self.next += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.selection.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SelectionIter<'_> {}

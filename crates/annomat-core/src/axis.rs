//! The two axes of an annotated matrix.

use std::fmt;

/// One of the two axes of an annotated matrix.
///
/// `Obs` is the row axis (observations), `Var` the column axis
/// (variables). Every aligned component belongs to exactly one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Rows of `X`; annotated by `obs`, aligned with `obsm`.
    Obs,
    /// Columns of `X`; annotated by `var`, aligned with `varm`.
    Var,
}

impl Axis {
    /// Name of the axis annotation table (`"obs"` or `"var"`).
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Obs => "obs",
            Self::Var => "var",
        }
    }

    /// Name of the axis-aligned multi-array map (`"obsm"` or `"varm"`).
    pub fn multi_array_name(self) -> &'static str {
        match self {
            Self::Obs => "obsm",
            Self::Var => "varm",
        }
    }

    /// Name of the axis name index (`"obs_names"` or `"var_names"`).
    pub fn names_name(self) -> &'static str {
        match self {
            Self::Obs => "obs_names",
            Self::Var => "var_names",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

//! View bookkeeping and the one-way View → Owned transition.
//!
//! A container is either Owned (its components hold storage nobody else
//! writes structurally) or a View (its components alias an Owned
//! ancestor's storage through selections). The first structural mutation on
//! a View calls [`ensure_owned`], which copies every component's addressed
//! data into fresh storage and forgets the selectors. Elementwise matrix
//! writes never come through here.

use annomat_core::Selection;
use tracing::{debug, trace};

use crate::axis_table::AxisTable;
use crate::matrix::MatrixStore;
use crate::multi_array::MultiArrayMap;
use crate::unstructured::UnstructuredMap;

/// Whether a container owns its storage, and if not, where it points.
#[derive(Clone, Debug)]
pub(crate) enum Backing {
    Owned,
    /// Absolute positions into the Owned ancestor.
    View { rows: Selection, cols: Selection },
}

/// The storage components of one container.
#[derive(Debug)]
pub(crate) struct Components {
    pub(crate) x: MatrixStore,
    pub(crate) obs: AxisTable,
    pub(crate) var: AxisTable,
    pub(crate) obsm: MultiArrayMap,
    pub(crate) varm: MultiArrayMap,
    pub(crate) uns: UnstructuredMap,
}

impl Components {
    /// Alias every component, narrowed to `rows` × `cols` (relative to
    /// these components). `uns` is shared whole.
    pub(crate) fn create_view(&self, rows: &Selection, cols: &Selection) -> Self {
        trace!(rows = rows.len(), cols = cols.len(), "creating view");
        Self {
            x: self.x.create_view(rows, cols),
            obs: self.obs.create_view(rows),
            var: self.var.create_view(cols),
            obsm: self.obsm.create_view(rows),
            varm: self.varm.create_view(cols),
            uns: self.uns.share(),
        }
    }

    /// Fresh, unshared copies of everything these components address.
    pub(crate) fn materialize(&self) -> Self {
        Self {
            x: self.x.materialize(),
            obs: self.obs.materialize(),
            var: self.var.materialize(),
            obsm: self.obsm.materialize(),
            varm: self.varm.materialize(),
            uns: self.uns.materialize(),
        }
    }
}

/// Turn a View into an Owned container in place.
///
/// Returns `false` without copying anything when already Owned.
pub(crate) fn ensure_owned(backing: &mut Backing, components: &mut Components) -> bool {
    let Backing::View { rows, cols } = &*backing else {
        return false;
    };
    debug!(
        rows = rows.len(),
        cols = cols.len(),
        obsm = components.obsm.len(),
        varm = components.varm.len(),
        uns = components.uns.len(),
        "materializing view"
    );
    *components = components.materialize();
    *backing = Backing::Owned;
    true
}

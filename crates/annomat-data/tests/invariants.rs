//! Property tests: alignment invariants survive arbitrary sequences of
//! indexing and mutation, and structural writes on views never reach the
//! root.

use annomat_core::SelectorSpec;
use annomat_data::AnnotatedMatrix;
use annomat_test_utils::{counting, fingerprint};
use ndarray::Array2;
use proptest::prelude::*;

/// One step applied to the container under test.
#[derive(Clone, Debug)]
enum Op {
    /// Replace the container with a view over a row mask.
    SliceRows(Vec<bool>),
    /// Replace the container with a view reversing the columns.
    ReverseCols,
    SetObsColumn,
    SetVarmEntry(usize),
    SetUnsEntry,
    Materialize,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::collection::vec(any::<bool>(), 0..12).prop_map(Op::SliceRows),
        Just(Op::ReverseCols),
        Just(Op::SetObsColumn),
        (1usize..6).prop_map(Op::SetVarmEntry),
        Just(Op::SetUnsEntry),
        Just(Op::Materialize),
    ]
}

fn check_aligned(m: &AnnotatedMatrix) -> Result<(), TestCaseError> {
    let (n, v) = m.shape();
    prop_assert_eq!(m.obs().len(), n);
    prop_assert_eq!(m.var().len(), v);
    prop_assert_eq!(m.obs_names().len(), n);
    prop_assert_eq!(m.var_names().len(), v);
    for name in m.obs().column_names() {
        prop_assert_eq!(m.obs().column(&name).unwrap().len(), n);
    }
    for key in m.obsm().keys() {
        prop_assert_eq!(m.obsm().entry_shape(&key).unwrap().0, n);
    }
    for key in m.varm().keys() {
        prop_assert_eq!(m.varm().entry_shape(&key).unwrap().0, v);
    }
    prop_assert_eq!(m.x().to_array().dim(), (n, v));
    Ok(())
}

fn apply(m: AnnotatedMatrix, op: &Op) -> AnnotatedMatrix {
    match op {
        Op::SliceRows(mask) => {
            let n = m.n_obs();
            let mask: Vec<bool> = (0..n).map(|i| mask.get(i).copied().unwrap_or(true)).collect();
            m.slice(mask, ..).unwrap()
        }
        Op::ReverseCols => {
            let cols: Vec<usize> = (0..m.n_vars()).rev().collect();
            m.slice(.., cols).unwrap()
        }
        Op::SetObsColumn => {
            let mut m = m;
            let n = m.n_obs();
            m.set_obs_column("idx", (0..n as i64).collect::<Vec<i64>>()).unwrap();
            m
        }
        Op::SetVarmEntry(width) => {
            let mut m = m;
            let v = m.n_vars();
            m.set_varm_entry("w", Array2::ones((v, *width))).unwrap();
            m
        }
        Op::SetUnsEntry => {
            let mut m = m;
            m.set_uns_entry("touched", true);
            m
        }
        Op::Materialize => {
            let mut m = m;
            m.materialize();
            m
        }
    }
}

proptest! {
    #[test]
    fn alignment_holds_after_any_sequence(
        (n, v) in (1usize..10, 1usize..10),
        ops in proptest::collection::vec(arb_op(), 0..12),
    ) {
        let root = counting(n, v);
        let mut current = root.slice(.., ..).unwrap();
        check_aligned(&current)?;
        for op in &ops {
            current = apply(current, op);
            check_aligned(&current)?;
        }
    }

    #[test]
    fn structural_writes_on_views_never_reach_root(
        (n, v) in (1usize..10, 1usize..10),
        mask in proptest::collection::vec(any::<bool>(), 10),
        ops in proptest::collection::vec(arb_op(), 1..8),
    ) {
        let root = counting(n, v);
        let before = fingerprint(&root);
        let rows: Vec<bool> = mask[..n].to_vec();
        let mut view = root.slice(rows, ..).unwrap();
        for op in ops.iter().filter(|op| !matches!(op, Op::SliceRows(_) | Op::ReverseCols)) {
            view = apply(view, op);
            prop_assert!(!view.is_view());
        }
        prop_assert_eq!(fingerprint(&root), before);
    }

    #[test]
    fn same_selectors_same_content(
        (n, v) in (1usize..10, 1usize..10),
        start in 0usize..10,
        len in 0usize..10,
    ) {
        let root = counting(n, v);
        let start = start.min(n);
        let end = (start + len).min(n);
        let a = root.slice(SelectorSpec::range(start, end), ..).unwrap();
        let b = root.slice(SelectorSpec::range(start, end), ..).unwrap();
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
        prop_assert_eq!(a.shape(), (end - start, v));
    }
}

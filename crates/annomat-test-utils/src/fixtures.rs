//! Reusable container fixtures.
//!
//! - [`annotated_3x3`]: small fully annotated container.
//! - [`zeros_100x100`]: 100×100 container with 100×50 `obsm["o"]` and
//!   `varm["o"]` entries, for multi-array mutation tests.

use annomat_core::Column;
use annomat_data::{AnnotatedMatrix, AnnotatedMatrixConfig, Annotations};
use ndarray::{array, Array2};

/// `X = [[1,2,3],[4,5,6],[7,8,9]]` with observation and variable
/// annotations and two `uns` entries.
///
/// | obs   | oanno1 (cat) | oanno2 | oanno3 |
/// |-------|--------------|--------|--------|
/// | name1 | cat1         | o1     | 2.1    |
/// | name2 | cat2         | o2     | 2.2    |
/// | name3 | cat2         | o3     | 2.3    |
///
/// `var` is `var1..var3` with `vanno1 = [3.1, 3.2, 3.3]`.
pub fn annotated_3x3() -> AnnotatedMatrix {
    let obs = Annotations::new(["name1", "name2", "name3"])
        .with_column("oanno1", Column::categorical(["cat1", "cat2", "cat2"]))
        .with_column("oanno2", vec!["o1", "o2", "o3"])
        .with_column("oanno3", vec![2.1f64, 2.2, 2.3]);
    let var = Annotations::new(["var1", "var2", "var3"]).with_column("vanno1", vec![3.1f64, 3.2, 3.3]);
    AnnotatedMatrixConfig::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]])
        .with_obs(obs)
        .with_var(var)
        .with_uns("oanno1_colors", vec!["#000000", "#FFFFFF"])
        .with_uns("uns2", vec!["some annotation"])
        .build()
        .expect("fixture is aligned")
}

/// 100×100 zeros with `obsm["o"]` and `varm["o"]` both 100×50 zeros.
pub fn zeros_100x100() -> AnnotatedMatrix {
    AnnotatedMatrixConfig::new(Array2::zeros((100, 100)))
        .with_obsm("o", Array2::zeros((100, 50)))
        .with_varm("o", Array2::zeros((100, 50)))
        .build()
        .expect("fixture is aligned")
}

/// An `n × m` container whose element `(i, j)` is `i * m + j`.
pub fn counting(n: usize, m: usize) -> AnnotatedMatrix {
    AnnotatedMatrix::new(Array2::from_shape_fn((n, m), |(i, j)| (i * m + j) as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotated_3x3_is_aligned() {
        let m = annotated_3x3();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.obs().column_names(), ["oanno1", "oanno2", "oanno3"]);
        assert_eq!(m.uns().keys(), ["oanno1_colors", "uns2"]);
    }

    #[test]
    fn zeros_100x100_has_multi_arrays() {
        let m = zeros_100x100();
        assert_eq!(m.obsm().entry_shape("o").unwrap(), (100, 50));
        assert_eq!(m.varm().entry_shape("o").unwrap(), (100, 50));
    }

    #[test]
    fn counting_values() {
        let m = counting(2, 3);
        assert_eq!(m.x().get(1, 2), Some(5.0));
    }
}

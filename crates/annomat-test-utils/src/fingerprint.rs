//! Content fingerprints for annotated matrices.
//!
//! Uses FNV-1a for a fast, deterministic structural hash. Two containers
//! with equal content (shape, names, columns, map entries, nested `uns`
//! values, in order) hash equal regardless of whether they are Views. Not
//! cryptographically secure; for equality checks in tests only.

use annomat_core::{Column, Value};
use annomat_data::{AnnotatedMatrix, AxisTable, MultiArrayMap};
use ndarray::Array2;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Running FNV-1a state.
struct Fnv(u64);

impl Fnv {
    #[inline]
    fn byte(&mut self, byte: u8) {
        self.0 = (self.0 ^ byte as u64).wrapping_mul(FNV_PRIME);
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.byte(b);
        }
    }

    fn u64(&mut self, v: u64) {
        self.bytes(&v.to_le_bytes());
    }

    fn len(&mut self, n: usize) {
        self.u64(n as u64);
    }

    /// Length-prefixed, so `["ab", "c"]` and `["a", "bc"]` differ.
    fn str(&mut self, s: &str) {
        self.len(s.len());
        self.bytes(s.as_bytes());
    }

    fn array(&mut self, a: &Array2<f32>) {
        self.len(a.nrows());
        self.len(a.ncols());
        for &v in a.iter() {
            self.bytes(&v.to_bits().to_le_bytes());
        }
    }

    fn column(&mut self, c: &Column) {
        match c {
            Column::Float(v) => {
                self.byte(0);
                self.len(v.len());
                v.iter().for_each(|x| self.u64(x.to_bits()));
            }
            Column::Int(v) => {
                self.byte(1);
                self.len(v.len());
                v.iter().for_each(|&x| self.u64(x as u64));
            }
            Column::Bool(v) => {
                self.byte(2);
                self.len(v.len());
                v.iter().for_each(|&x| self.byte(x as u8));
            }
            Column::Text(v) => {
                self.byte(3);
                self.len(v.len());
                v.iter().for_each(|s| self.str(s));
            }
            Column::Categorical(c) => {
                self.byte(4);
                self.len(c.categories().len());
                c.categories().iter().for_each(|s| self.str(s));
                self.len(c.len());
                c.codes().iter().for_each(|&x| self.u64(x as u64));
            }
        }
    }

    fn value(&mut self, v: &Value) {
        match v {
            Value::Bool(b) => {
                self.byte(0);
                self.byte(*b as u8);
            }
            Value::Int(i) => {
                self.byte(1);
                self.u64(*i as u64);
            }
            Value::Float(f) => {
                self.byte(2);
                self.u64(f.to_bits());
            }
            Value::Text(s) => {
                self.byte(3);
                self.str(s);
            }
            Value::Seq(items) => {
                self.byte(4);
                self.len(items.len());
                items.iter().for_each(|item| self.value(item));
            }
            Value::Map(map) => {
                self.byte(5);
                self.len(map.len());
                for (k, item) in map {
                    self.str(k);
                    self.value(item);
                }
            }
        }
    }

    fn table(&mut self, table: &AxisTable) {
        let names = table.names();
        self.len(names.len());
        names.iter().for_each(|n| self.str(n));
        let columns = table.column_names();
        self.len(columns.len());
        for name in &columns {
            self.str(name);
            self.column(&table.column(name).expect("listed column resolves"));
        }
    }

    fn multi_array(&mut self, map: &MultiArrayMap) {
        let keys = map.keys();
        self.len(keys.len());
        for key in &keys {
            self.str(key);
            self.array(&map.get(key).expect("listed entry resolves"));
        }
    }
}

/// Compute a structural hash over everything `m` addresses.
///
/// Components are folded in a fixed order (`X`, `obs`, `var`, `obsm`,
/// `varm`, `uns`), each prefixed by its entry count so that moving an entry
/// between components changes the hash.
pub fn fingerprint(m: &AnnotatedMatrix) -> u64 {
    let mut h = Fnv(FNV_OFFSET);
    h.array(&m.x().to_array());
    h.table(m.obs());
    h.table(m.var());
    h.multi_array(m.obsm());
    h.multi_array(m.varm());
    let uns = m.uns().to_map();
    h.len(uns.len());
    for (k, v) in &uns {
        h.str(k);
        h.value(v);
    }
    h.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::annotated_3x3;

    #[test]
    fn same_content_same_hash() {
        assert_eq!(fingerprint(&annotated_3x3()), fingerprint(&annotated_3x3()));
    }

    #[test]
    fn view_and_copy_hash_equal() {
        let root = annotated_3x3();
        let view = root.slice(0..2usize, [2usize, 0]).unwrap();
        assert_eq!(fingerprint(&view), fingerprint(&view.to_owned_copy()));
        assert_ne!(fingerprint(&view), fingerprint(&root));
    }

    #[test]
    fn element_change_changes_hash() {
        let root = annotated_3x3();
        let before = fingerprint(&root);
        root.x().set(2, 2, 0.5).unwrap();
        assert_ne!(fingerprint(&root), before);
    }

    #[test]
    fn columns_and_entries_are_hashed() {
        let mut a = annotated_3x3();
        let before = fingerprint(&a);
        a.set_var_column("vanno2", vec![1i64, 2, 3]).unwrap();
        let with_column = fingerprint(&a);
        assert_ne!(with_column, before);
        a.set_obsm_entry("e", ndarray::Array2::zeros((3, 1))).unwrap();
        assert_ne!(fingerprint(&a), with_column);
    }

    #[test]
    fn nested_uns_is_hashed() {
        let mut a = annotated_3x3();
        let before = fingerprint(&a);
        a.set_uns_entry("uns2", vec!["other annotation"]);
        assert_ne!(fingerprint(&a), before);
    }
}

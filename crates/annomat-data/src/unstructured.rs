//! The unstructured metadata map (`uns`).
//!
//! `uns` is never subset: a view container reads the same map as its root.

use std::cell::RefCell;
use std::rc::Rc;

use annomat_core::{AnnError, Value};
use indexmap::IndexMap;

/// Key-to-value map input, in insertion order.
pub type ValueMap = IndexMap<String, Value>;

const MAP_NAME: &str = "uns";

/// Handle onto a (possibly shared) unstructured map.
#[derive(Debug, Default)]
pub struct UnstructuredMap {
    entries: Rc<RefCell<ValueMap>>,
}

impl UnstructuredMap {
    /// An empty owned map.
    pub fn new() -> Self {
        Self::default()
    }

    /// An owned map holding `entries`.
    pub fn from_entries(entries: ValueMap) -> Self {
        Self {
            entries: Rc::new(RefCell::new(entries)),
        }
    }

    /// A second handle onto the same map.
    pub fn share(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }

    /// Copy of the value under `key`.
    pub fn get(&self, key: &str) -> Result<Value, AnnError> {
        self.entries
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| AnnError::key_not_found(MAP_NAME, key))
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Deep copy of the whole map.
    pub fn to_map(&self) -> ValueMap {
        self.entries.borrow().clone()
    }

    pub(crate) fn set(&mut self, key: String, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    /// Check that `key` is present.
    pub fn check_remove(&self, key: &str) -> Result<(), AnnError> {
        if !self.contains_key(key) {
            return Err(AnnError::key_not_found(MAP_NAME, key));
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Result<Value, AnnError> {
        self.entries
            .borrow_mut()
            .shift_remove(key)
            .ok_or_else(|| AnnError::key_not_found(MAP_NAME, key))
    }

    pub(crate) fn replace_all(&mut self, entries: ValueMap) {
        *self.entries.borrow_mut() = entries;
    }

    /// Deep copy into fresh storage owned by the result.
    pub fn materialize(&self) -> Self {
        Self::from_entries(self.to_map())
    }

    /// Whether both handles address the same storage.
    pub fn shares_storage(&self, other: &UnstructuredMap) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

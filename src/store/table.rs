//! DataStore implementation
//!
//! BTreeMap keyed by DID so listings come out in identifier order.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::{default_seed, Did};

/// Volatile DID → value table
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    entries: BTreeMap<Did, Bytes>,
}

impl DataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in seed table
    pub fn seeded() -> Self {
        default_seed().into_iter().collect()
    }

    /// Look up a value; `None` when the DID was never written
    pub fn read(&self, did: Did) -> Option<Bytes> {
        self.entries.get(&did).cloned()
    }

    /// Insert or replace the value for `did`
    ///
    /// Returns the previous value, if any.
    pub fn write(&mut self, did: Did, value: impl Into<Bytes>) -> Option<Bytes> {
        self.entries.insert(did, value.into())
    }

    /// Check whether a DID is present
    pub fn contains(&self, did: Did) -> bool {
        self.entries.contains_key(&did)
    }

    /// Number of stored DIDs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All DIDs in ascending order
    pub fn dids(&self) -> Vec<Did> {
        self.entries.keys().copied().collect()
    }
}

impl<V: Into<Bytes>> FromIterator<(Did, V)> for DataStore {
    fn from_iter<I: IntoIterator<Item = (Did, V)>>(iter: I) -> Self {
        let mut store = DataStore::new();
        for (did, value) in iter {
            store.write(did, value);
        }
        store
    }
}

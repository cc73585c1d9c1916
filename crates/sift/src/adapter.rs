//! Reference key/value adapters.
//!
//! [`MemoryAdapter`] is a thread-safe store that can be filled while an
//! engine queries it. A plain `HashMap<String, Vec<T>>` also works as an
//! adapter when the data is fixed up front, and scans it without copying.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::engine::KeyValueAdapter;
use crate::record::Record;
use crate::sequence::Scan;

/// In-memory records grouped by keyspace, in insertion order.
#[derive(Debug)]
pub struct MemoryAdapter<T> {
    keyspaces: RwLock<HashMap<String, Vec<T>>>,
}

impl<T> Default for MemoryAdapter<T> {
    fn default() -> Self {
        MemoryAdapter {
            keyspaces: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> MemoryAdapter<T> {
    /// Creates an empty adapter.
    pub fn new() -> Self {
        MemoryAdapter::default()
    }

    /// Appends `record` to `keyspace`, creating the keyspace if needed.
    pub fn put(&self, keyspace: &str, record: T) {
        self.keyspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(keyspace.to_string())
            .or_default()
            .push(record);
    }

    /// Appends every record to `keyspace`.
    pub fn put_all(&self, keyspace: &str, records: impl IntoIterator<Item = T>) {
        self.keyspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(keyspace.to_string())
            .or_default()
            .extend(records);
    }

    /// Removes `keyspace` and returns its records.
    pub fn delete_all_of(&self, keyspace: &str) -> Vec<T> {
        self.keyspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(keyspace)
            .unwrap_or_default()
    }

    /// Names of the keyspaces holding records, sorted.
    pub fn keyspaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .keyspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of records in `keyspace`.
    pub fn len_of(&self, keyspace: &str) -> usize {
        self.keyspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(keyspace)
            .map_or(0, Vec::len)
    }
}

impl<T> FromIterator<(String, T)> for MemoryAdapter<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let adapter = MemoryAdapter::new();
        for (keyspace, record) in iter {
            adapter.put(&keyspace, record);
        }
        adapter
    }
}

impl<T> KeyValueAdapter for MemoryAdapter<T>
where
    T: Record + Clone + Send + Sync,
{
    type Record = T;

    /// Snapshots the keyspace so the lock is not held while querying.
    fn get_all_of(&self, keyspace: &str) -> Option<Scan<'_, T>> {
        self.keyspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(keyspace)
            .map(|records| Scan::Vec(records.clone()))
    }
}

impl<T, S> KeyValueAdapter for HashMap<String, Vec<T>, S>
where
    T: Record + Clone + Send + Sync,
    S: std::hash::BuildHasher + Send + Sync,
{
    type Record = T;

    fn get_all_of(&self, keyspace: &str) -> Option<Scan<'_, T>> {
        self.get(keyspace).map(Vec::as_slice).map(Scan::Slice)
    }
}

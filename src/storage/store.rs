//! Ordered key-value store abstraction
//!
//! Every account operation runs against an [`Overlay`]: reads fall through
//! to the backing store, writes are buffered, and [`Overlay::commit`] hands
//! the whole batch to the store in one call. Dropping an overlay without
//! committing discards its writes.

use super::persistence::StorageError;
use std::collections::BTreeMap;

/// A buffered write: `Some(value)` sets, `None` deletes
pub type WriteOp = (Vec<u8>, Option<Vec<u8>>);

/// Ordered key-value storage with prefix operations
pub trait KvStore {
    /// Read a single key
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write a single key
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Remove a single key (no-op if absent)
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;

    /// Remove every key starting with `prefix`, returning how many were removed
    fn delete_prefix(&mut self, prefix: &[u8]) -> Result<usize, StorageError> {
        let keys: Vec<Vec<u8>> = self
            .scan_prefix(prefix)?
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        for key in &keys {
            self.delete(key)?;
        }
        Ok(keys.len())
    }

    /// Apply a batch of writes as one unit
    fn write_batch(&mut self, batch: Vec<WriteOp>) -> Result<(), StorageError> {
        for (key, value) in batch {
            match value {
                Some(v) => self.set(&key, &v)?,
                None => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// In-memory ordered store
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Vec<u8>)> {
        self.entries.iter()
    }
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Write-buffering view over a store
pub struct Overlay<'a, S: KvStore + ?Sized> {
    inner: &'a mut S,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> Overlay<'a, S> {
    /// Start a new unit of work over `inner`
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            writes: BTreeMap::new(),
        }
    }

    /// Apply every buffered write to the backing store
    pub fn commit(self) -> Result<(), StorageError> {
        if self.writes.is_empty() {
            return Ok(());
        }
        let batch: Vec<WriteOp> = self.writes.into_iter().collect();
        self.inner.write_batch(batch)
    }
}

impl<S: KvStore + ?Sized> KvStore for Overlay<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self.writes.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.inner.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.inner.scan_prefix(prefix)?.into_iter().collect();

        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

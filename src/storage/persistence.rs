//! File-backed persistence for account state
//!
//! [`FileStore`] keeps the full key space in memory and writes a JSON
//! snapshot to disk after every committed batch.

use super::store::{KvStore, MemoryStore, WriteOp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Corrupt {table} entry: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub state_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".multisig_data"),
            state_file: "account.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// On-disk snapshot format: hex keys to hex values
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    entries: BTreeMap<String, String>,
}

/// Key-value store persisted as a JSON snapshot
pub struct FileStore {
    config: StorageConfig,
    data: MemoryStore,
}

impl FileStore {
    /// Open the store, loading an existing snapshot if there is one
    pub fn open(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        let mut store = Self {
            config,
            data: MemoryStore::new(),
        };
        if store.exists() {
            store.data = store.load()?;
            log::debug!(
                "Loaded {} entries from {:?}",
                store.data.len(),
                store.state_path()
            );
        }
        Ok(store)
    }

    /// Get the snapshot file path
    fn state_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.state_file, index))
    }

    fn temp_path(&self) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.tmp", self.config.state_file))
    }

    /// Check if a saved snapshot exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn load(&self) -> Result<MemoryStore, StorageError> {
        let file = fs::File::open(self.state_path())?;
        let reader = BufReader::new(file);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;

        snapshot
            .entries
            .into_iter()
            .map(|(k, v)| -> Result<(Vec<u8>, Vec<u8>), StorageError> {
                let key = hex::decode(&k)
                    .map_err(|e| StorageError::InvalidData(format!("key {}: {}", k, e)))?;
                let value = hex::decode(&v)
                    .map_err(|e| StorageError::InvalidData(format!("value of {}: {}", k, e)))?;
                Ok((key, value))
            })
            .collect()
    }

    /// Write the current state to disk
    ///
    /// Backups only rotate once the new snapshot is safely in the temp
    /// file, so a failed write leaves the previous snapshot and its backups
    /// exactly as they were.
    pub fn save(&self) -> Result<(), StorageError> {
        let path = self.state_path();

        let snapshot = Snapshot {
            entries: self
                .data
                .iter()
                .map(|(k, v)| (hex::encode(k), hex::encode(v)))
                .collect(),
        };

        // Write to temporary file first
        let temp_path = self.temp_path();
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.data.get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.data.set(key, value)?;
        self.save()
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.data.delete(key)?;
        self.save()
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        self.data.scan_prefix(prefix)
    }

    fn delete_prefix(&mut self, prefix: &[u8]) -> Result<usize, StorageError> {
        let removed = self.data.delete_prefix(prefix)?;
        self.save()?;
        Ok(removed)
    }

    fn write_batch(&mut self, batch: Vec<WriteOp>) -> Result<(), StorageError> {
        // Stage on a copy so a failed save leaves memory and disk in agreement
        let mut staged = self.data.clone();
        staged.write_batch(batch)?;
        let previous = std::mem::replace(&mut self.data, staged);
        if let Err(e) = self.save() {
            self.data = previous;
            return Err(e);
        }
        Ok(())
    }
}

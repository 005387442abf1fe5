//! Key-value persistence backing the favorites store.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;

const LOCK_FILE: &str = ".lock";

/// Errors from the underlying storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key '{key}'")]
    InvalidKey { key: String },

    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Storage task failed: {0}")]
    Task(String),

    #[error("Storage rejected write to '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

/// Asynchronous string key-value storage.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. Absent keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key under a data directory.
///
/// Every access holds an advisory lock on `<dir>/.lock` for its duration,
/// and writes go through a temp file + rename so a reader never sees a
/// half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Stored bytes as text. Invalid UTF-8 is content damage, not an I/O
/// failure: it is replaced so the caller's parser can discard it.
fn decode_value(key: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(key = %key, "Stored value is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Advisory lock on the storage directory, released on drop.
struct StorageLock {
    file: File,
}

impl StorageLock {
    fn acquire(dir: &Path, exclusive: bool) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(dir.join(LOCK_FILE))?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(Self { file })
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            if !dir.exists() {
                return Ok(None);
            }
            let io_err = |source| StorageError::Io {
                key: key.clone(),
                source,
            };
            let _lock = StorageLock::acquire(&dir, false).map_err(io_err)?;
            match fs::read(&path) {
                Ok(bytes) => Ok(Some(decode_value(&key, bytes))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_err(e)),
            }
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        let key = key.to_string();
        let value = value.to_string();

        tokio::task::spawn_blocking(move || {
            let io_err = |source| StorageError::Io {
                key: key.clone(),
                source,
            };
            fs::create_dir_all(&dir).map_err(io_err)?;
            let _lock = StorageLock::acquire(&dir, true).map_err(io_err)?;

            let tmp_path = path.with_extension("json.tmp");
            let mut tmp = File::create(&tmp_path).map_err(io_err)?;
            tmp.write_all(value.as_bytes()).map_err(io_err)?;
            tmp.sync_all().map_err(io_err)?;
            drop(tmp);
            fs::rename(&tmp_path, &path).map_err(io_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

/// In-process storage with failure injection.
///
/// Used by tests and by callers that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw value already stored under `key`.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every write, widening the window for interleaving.
    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::other("injected read failure"),
            });
        }
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

//! Filesystem ledger
//!
//! One JSON file per key, named by the hex BLAKE3 digest of the key so that
//! any asset id, whatever its length or characters, maps to a safe file name
//! of fixed length:
//!
//! ```text
//! {base_path}/{blake3(key)}.json  =>  {"version": 3, "value": "<base64>"}
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the entry, so
//! a reader never observes a half-written record.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use estate_core::{EstateError, LedgerEffects, Result, Versioned, WriteCondition};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    version: u64,
    value: String,
}

/// Ledger persisted under a directory
///
/// Compare-and-write is serialized through a lock shared by all clones, so
/// it is atomic within one process. Running two processes against the same
/// directory is not supported.
#[derive(Debug, Clone)]
pub struct FilesystemLedger {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FilesystemLedger {
    /// Handler rooted at `base_path`; the directory is created on first write
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create the directory if needed and return the handler
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let ledger = Self::new(base_path);
        fs::create_dir_all(&ledger.base_path).await.map_err(|e| {
            EstateError::storage(format!(
                "Failed to create ledger directory {}: {e}",
                ledger.base_path.display()
            ))
        })?;
        Ok(ledger)
    }

    /// Directory holding the entries
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.json", blake3::hash(key.as_bytes()).to_hex()))
    }

    async fn read_entry(&self, path: &Path) -> Result<Option<Versioned>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EstateError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        let stored: StoredEntry = serde_json::from_slice(&bytes)?;
        let value = STANDARD.decode(stored.value.as_bytes()).map_err(|e| {
            EstateError::serialization(format!("Corrupt ledger entry {}: {e}", path.display()))
        })?;
        Ok(Some(Versioned {
            version: stored.version,
            value,
        }))
    }
}

#[async_trait]
impl LedgerEffects for FilesystemLedger {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>> {
        if key.is_empty() {
            return Ok(None);
        }
        self.read_entry(&self.entry_path(key)).await
    }

    async fn put_versioned(
        &self,
        key: &str,
        value: Vec<u8>,
        condition: WriteCondition,
    ) -> Result<u64> {
        if key.is_empty() {
            return Err(EstateError::invalid("Ledger key cannot be empty"));
        }

        let path = self.entry_path(key);
        let _guard = self.write_lock.lock().await;

        let current = self.read_entry(&path).await?.map(|entry| entry.version);
        if !condition.holds(current) {
            return Err(EstateError::conflict(format!(
                "write to {key} expected {condition:?} but found version {current:?}"
            )));
        }

        let version = current.map_or(1, |v| v + 1);
        let stored = StoredEntry {
            version,
            value: STANDARD.encode(&value),
        };
        let bytes = serde_json::to_vec(&stored)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| EstateError::storage(format!("Failed to create directory: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| EstateError::storage(format!("Failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            EstateError::storage(format!("Failed to commit {}: {e}", path.display()))
        })?;

        debug!(key, version, path = %path.display(), "ledger write");
        Ok(version)
    }
}

//! Filesystem object store
//!
//! Objects live at `{base_path}/{handle}.blob`. Reads re-hash the bytes and
//! fail with a storage error when the file no longer matches its handle.
//! Writes are serialized through a lock shared by all clones, so concurrent
//! puts of the same content never share a half-written temp file.

use super::{content_handle, is_well_formed, unknown_handle};
use async_trait::async_trait;
use estate_core::{EstateError, ObjectStoreEffects, ReportHandle, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Object store persisted under a directory
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FilesystemObjectStore {
    /// Handler rooted at `base_path`; the directory is created on first write
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create the directory if needed and return the handler
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(base_path);
        fs::create_dir_all(&store.base_path).await.map_err(|e| {
            EstateError::storage(format!(
                "Failed to create object store directory {}: {e}",
                store.base_path.display()
            ))
        })?;
        Ok(store)
    }

    /// Directory holding the blobs
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, handle: &ReportHandle) -> PathBuf {
        self.base_path.join(format!("{handle}.blob"))
    }
}

#[async_trait]
impl ObjectStoreEffects for FilesystemObjectStore {
    async fn put(&self, data: Vec<u8>) -> Result<ReportHandle> {
        let handle = content_handle(&data);
        let path = self.object_path(&handle);
        let _guard = self.write_lock.lock().await;

        if fs::metadata(&path).await.is_ok() {
            debug!(handle = %handle, "object already stored");
            return Ok(handle);
        }

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| EstateError::storage(format!("Failed to create directory: {e}")))?;

        let tmp = path.with_extension("blob.tmp");
        fs::write(&tmp, &data)
            .await
            .map_err(|e| EstateError::storage(format!("Failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            EstateError::storage(format!("Failed to commit {}: {e}", path.display()))
        })?;

        debug!(handle = %handle, size = data.len(), "object stored");
        Ok(handle)
    }

    async fn get(&self, handle: &ReportHandle) -> Result<Vec<u8>> {
        if !is_well_formed(handle) {
            return Err(unknown_handle(handle));
        }

        let path = self.object_path(handle);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(unknown_handle(handle)),
            Err(e) => {
                return Err(EstateError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        if content_handle(&data) != *handle {
            warn!(handle = %handle, path = %path.display(), "object failed integrity check");
            return Err(EstateError::storage(format!(
                "Object {handle} does not match its content"
            )));
        }
        Ok(data)
    }

    async fn contains(&self, handle: &ReportHandle) -> Result<bool> {
        if !is_well_formed(handle) {
            return Ok(false);
        }
        Ok(fs::metadata(self.object_path(handle)).await.is_ok())
    }
}

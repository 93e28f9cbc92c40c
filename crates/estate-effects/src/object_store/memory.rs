//! In-memory object store

use super::{content_handle, unknown_handle};
use async_trait::async_trait;
use estate_core::{ObjectStoreEffects, ReportHandle, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Object store held in process memory; clones share the same objects
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<ReportHandle, Vec<u8>>>>,
}

impl MemoryObjectStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// True before the first write
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStoreEffects for MemoryObjectStore {
    async fn put(&self, data: Vec<u8>) -> Result<ReportHandle> {
        let handle = content_handle(&data);
        let size = data.len();
        self.objects
            .write()
            .await
            .entry(handle.clone())
            .or_insert(data);
        debug!(handle = %handle, size, "object stored");
        Ok(handle)
    }

    async fn get(&self, handle: &ReportHandle) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| unknown_handle(handle))
    }

    async fn contains(&self, handle: &ReportHandle) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(handle))
    }
}

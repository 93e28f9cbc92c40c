//! In-memory ledger

use async_trait::async_trait;
use estate_core::{EstateError, LedgerEffects, Result, Versioned, WriteCondition};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Ledger held in process memory
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: Arc<RwLock<HashMap<String, Versioned>>>,
}

impl MemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True before the first write
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerEffects for MemoryLedger {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
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

        let mut entries = self.entries.write().await;
        let current = entries.get(key).map(|entry| entry.version);
        if !condition.holds(current) {
            return Err(EstateError::conflict(format!(
                "write to {key} expected {condition:?} but found version {current:?}"
            )));
        }

        let version = current.map_or(1, |v| v + 1);
        entries.insert(key.to_string(), Versioned { version, value });
        debug!(key, version, "ledger write");
        Ok(version)
    }
}

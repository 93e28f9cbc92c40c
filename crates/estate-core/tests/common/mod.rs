//! Shared in-memory ledger for lifecycle integration tests

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use estate_core::{
    AssetId, EstateError, LedgerEffects, LifecyclePolicy, Result, Versioned, WriteCondition,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct TestLedger {
    entries: Mutex<HashMap<String, Versioned>>,
}

impl TestLedger {
    /// Raw bytes currently stored under `key`
    pub fn raw(&self, key: &str) -> Option<Versioned> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl LedgerEffects for TestLedger {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put_versioned(
        &self,
        key: &str,
        value: Vec<u8>,
        condition: WriteCondition,
    ) -> Result<u64> {
        let mut entries = self.entries.lock().unwrap();
        let current = entries.get(key).map(|e| e.version);
        if !condition.holds(current) {
            return Err(EstateError::conflict(format!(
                "{key}: expected {condition:?}, found {current:?}"
            )));
        }
        let version = current.unwrap_or(0) + 1;
        entries.insert(key.to_string(), Versioned { version, value });
        Ok(version)
    }
}

pub fn lifecycle(policy: LifecyclePolicy) -> estate_core::AssetLifecycle<TestLedger> {
    estate_core::AssetLifecycle::new(TestLedger::default(), policy)
}

pub fn id(raw: &str) -> AssetId {
    AssetId::parse(raw).unwrap()
}

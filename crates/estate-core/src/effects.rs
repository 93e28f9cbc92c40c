//! Collaborator interfaces
//!
//! The lifecycle depends on two external services, both expressed as effect
//! traits so that handlers can be swapped (memory for tests, filesystem or a
//! real ledger in deployment):
//!
//! - [`LedgerEffects`]: durable key-value mapping from asset id to record
//!   bytes, with a version per key so that a read-modify-write can be
//!   committed conditionally.
//! - [`ObjectStoreEffects`]: content-addressed blob store for inspection
//!   reports.

use crate::errors::Result;
use crate::types::ReportHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// A stored value with the version it was written at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    /// Starts at 1 and increases by one per write of the key
    pub version: u64,
    /// Stored bytes
    pub value: Vec<u8>,
}

/// Precondition for a ledger write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition {
    /// Unconditional write
    Any,
    /// The key must not exist yet
    Absent,
    /// The key must still be at this version
    Version(u64),
}

impl WriteCondition {
    /// Whether a key currently at `current` satisfies this condition
    pub fn holds(self, current: Option<u64>) -> bool {
        match (self, current) {
            (WriteCondition::Any, _) => true,
            (WriteCondition::Absent, None) => true,
            (WriteCondition::Absent, Some(_)) => false,
            (WriteCondition::Version(expected), Some(actual)) => expected == actual,
            (WriteCondition::Version(_), None) => false,
        }
    }
}

/// Ledger key-value operations
///
/// A write whose condition does not hold fails with `Conflict` and leaves the
/// stored value unchanged.
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Read a key together with its version
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>>;

    /// Write a key if `condition` holds; returns the new version
    async fn put_versioned(
        &self,
        key: &str,
        value: Vec<u8>,
        condition: WriteCondition,
    ) -> Result<u64>;

    /// Read a key, dropping the version
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get_versioned(key).await?.map(|entry| entry.value))
    }

    /// Unconditional write
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.put_versioned(key, value, WriteCondition::Any).await?;
        Ok(())
    }
}

/// Content-addressed blob storage
#[async_trait]
pub trait ObjectStoreEffects: Send + Sync {
    /// Store bytes; equal content yields an equal handle
    async fn put(&self, data: Vec<u8>) -> Result<ReportHandle>;

    /// Fetch bytes; unknown handles fail with `NotFound`
    async fn get(&self, handle: &ReportHandle) -> Result<Vec<u8>>;

    /// Whether a blob is stored under `handle`
    async fn contains(&self, handle: &ReportHandle) -> Result<bool>;
}

#[async_trait]
impl<T: LedgerEffects + ?Sized> LedgerEffects for Arc<T> {
    async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>> {
        (**self).get_versioned(key).await
    }

    async fn put_versioned(
        &self,
        key: &str,
        value: Vec<u8>,
        condition: WriteCondition,
    ) -> Result<u64> {
        (**self).put_versioned(key, value, condition).await
    }
}

#[async_trait]
impl<T: ObjectStoreEffects + ?Sized> ObjectStoreEffects for Arc<T> {
    async fn put(&self, data: Vec<u8>) -> Result<ReportHandle> {
        (**self).put(data).await
    }

    async fn get(&self, handle: &ReportHandle) -> Result<Vec<u8>> {
        (**self).get(handle).await
    }

    async fn contains(&self, handle: &ReportHandle) -> Result<bool> {
        (**self).contains(handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_conditions() {
        assert!(WriteCondition::Any.holds(None));
        assert!(WriteCondition::Any.holds(Some(3)));
        assert!(WriteCondition::Absent.holds(None));
        assert!(!WriteCondition::Absent.holds(Some(1)));
        assert!(WriteCondition::Version(2).holds(Some(2)));
        assert!(!WriteCondition::Version(2).holds(Some(3)));
        assert!(!WriteCondition::Version(2).holds(None));
    }
}

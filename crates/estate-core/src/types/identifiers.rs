//! Asset identifiers and report handles

use crate::errors::{EstateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier of an asset; also its ledger key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Generate a fresh identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validate a caller-supplied identifier
    ///
    /// Surrounding whitespace is trimmed; an empty result is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EstateError::invalid("assetId cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Ledger key for this asset
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AssetId {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Object-store handle of an inspection report
///
/// The empty handle means no report has been submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportHandle(String);

impl ReportHandle {
    /// Wrap a handle returned by the object store
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Validate a caller-supplied handle
    ///
    /// Surrounding whitespace is trimmed; an empty result is rejected, since
    /// the empty handle is reserved for "no report".
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EstateError::invalid("report handle cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Handle of a record with no report
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// True when no report has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Handle as stored in the record
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

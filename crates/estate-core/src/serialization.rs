//! Ledger encoding of asset records (JSON)

use crate::errors::{EstateError, Result};
use crate::types::AssetRecord;

/// Encode a record for the ledger
pub fn encode_record(record: &AssetRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| {
        EstateError::serialization(format!(
            "Failed to encode asset {}: {e}",
            record.asset_id()
        ))
    })
}

/// Decode a record read from the ledger
pub fn decode_record(bytes: &[u8]) -> Result<AssetRecord> {
    serde_json::from_slice(bytes)
        .map_err(|e| EstateError::serialization(format!("Failed to decode asset record: {e}")))
}

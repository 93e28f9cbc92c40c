//! Lifecycle status of an asset
//!
//! ```text
//! available → offerMade → inspectionPending → inspectionComplete
//!     ↑           │                                   │
//!     └─ reject ──┘                              escrowFunded
//!                                                     │
//!                       completed ← propertyTransferred
//! ```
//!
//! Progress is strictly forward except the rejection edge
//! `offerMade → available`. `completed` is terminal.

use crate::errors::{EstateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an asset's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetStatus {
    /// Listed by the seller with a minimum price
    Available,
    /// A buyer has proposed a price
    OfferMade,
    /// Seller accepted; waiting for the inspector
    InspectionPending,
    /// Inspection report recorded
    InspectionComplete,
    /// Buyer funded escrow
    EscrowFunded,
    /// Seller transferred the property
    PropertyTransferred,
    /// Escrow released to the seller
    Completed,
}

impl AssetStatus {
    /// Every status, in lifecycle order
    pub const ALL: [AssetStatus; 7] = [
        AssetStatus::Available,
        AssetStatus::OfferMade,
        AssetStatus::InspectionPending,
        AssetStatus::InspectionComplete,
        AssetStatus::EscrowFunded,
        AssetStatus::PropertyTransferred,
        AssetStatus::Completed,
    ];

    /// Only `completed`
    pub fn is_terminal(self) -> bool {
        matches!(self, AssetStatus::Completed)
    }

    /// Wire name, as stored in the ledger record
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::OfferMade => "offerMade",
            AssetStatus::InspectionPending => "inspectionPending",
            AssetStatus::InspectionComplete => "inspectionComplete",
            AssetStatus::EscrowFunded => "escrowFunded",
            AssetStatus::PropertyTransferred => "propertyTransferred",
            AssetStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self> {
        AssetStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| EstateError::invalid(format!("unknown asset status: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for status in AssetStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<AssetStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_only_completed_is_terminal() {
        let terminal: Vec<_> = AssetStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![AssetStatus::Completed]);
    }
}

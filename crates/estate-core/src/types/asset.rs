//! The asset record
//!
//! `AssetRecord` is an immutable value. Fields are private; the only way to
//! obtain a changed record is one of the `with_*` helpers, which return a new
//! value and leave `self` untouched. Precondition checks live in
//! [`crate::transition`], not here.

use super::{Amount, AssetId, AssetStatus, ReportHandle};
use serde::{Deserialize, Serialize};

/// The sole entity tracked by the lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    asset_id: AssetId,
    seller: String,
    #[serde(default)]
    buyer: String,
    offer_price: Amount,
    #[serde(default)]
    inspector: String,
    #[serde(default, alias = "ipfsHash")]
    report_handle: ReportHandle,
    status: AssetStatus,
}

impl AssetRecord {
    /// A freshly listed asset: `available`, no buyer, inspector or report
    pub fn new(asset_id: AssetId, seller: impl Into<String>, minimum_price: Amount) -> Self {
        Self {
            asset_id,
            seller: seller.into(),
            buyer: String::new(),
            offer_price: minimum_price,
            inspector: String::new(),
            report_handle: ReportHandle::empty(),
            status: AssetStatus::Available,
        }
    }

    /// Identifier, also the ledger key
    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    /// Listing party
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// Empty until an offer exists
    pub fn buyer(&self) -> &str {
        &self.buyer
    }

    /// Minimum ask while `available`, proposed offer while `offerMade`
    pub fn offer_price(&self) -> Amount {
        self.offer_price
    }

    /// Empty until a report is submitted
    pub fn inspector(&self) -> &str {
        &self.inspector
    }

    /// Object-store handle of the report; set at most once
    pub fn report_handle(&self) -> &ReportHandle {
        &self.report_handle
    }

    /// Current lifecycle phase
    pub fn status(&self) -> AssetStatus {
        self.status
    }

    /// Record carrying a buyer's offer, in `offerMade`
    pub fn with_offer(&self, buyer: impl Into<String>, price: Amount) -> Self {
        Self {
            buyer: buyer.into(),
            offer_price: price,
            status: AssetStatus::OfferMade,
            ..self.clone()
        }
    }

    /// Record with the offer cleared, back in `available`
    pub fn without_offer(&self) -> Self {
        Self {
            buyer: String::new(),
            offer_price: Amount::ZERO,
            status: AssetStatus::Available,
            ..self.clone()
        }
    }

    /// Record carrying the inspection outcome, in `inspectionComplete`
    pub fn with_inspection(&self, inspector: impl Into<String>, handle: ReportHandle) -> Self {
        Self {
            inspector: inspector.into(),
            report_handle: handle,
            status: AssetStatus::InspectionComplete,
            ..self.clone()
        }
    }

    /// Record moved to `status` with every other field unchanged
    pub fn with_status(&self, status: AssetStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

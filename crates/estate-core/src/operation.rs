//! Closed set of contract operations
//!
//! Callers name an operation with [`OperationName`] (the contract's camelCase
//! name), build a typed [`ContractCall`], and hand it to
//! [`AssetLifecycle::dispatch`], which routes each variant to exactly one
//! lifecycle method.

use crate::effects::LedgerEffects;
use crate::errors::{EstateError, Result};
use crate::lifecycle::AssetLifecycle;
use crate::types::{Amount, AssetId, AssetRecord, ReportHandle};
use serde::Serialize;
use std::fmt;

/// Contract operation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationName {
    /// `createAsset`
    CreateAsset,
    /// `getAsset`
    GetAsset,
    /// `getMinimumPrice`
    GetMinimumPrice,
    /// `makeOffer`
    MakeOffer,
    /// `getOfferPrice`
    GetOfferPrice,
    /// `acceptOffer`
    AcceptOffer,
    /// `rejectOffer`
    RejectOffer,
    /// `submitInspectionReport`
    SubmitInspectionReport,
    /// `getInspectionReport`
    GetInspectionReport,
    /// `fundEscrow`
    FundEscrow,
    /// `propertyTransfer`
    PropertyTransfer,
    /// `releaseEscrow`
    ReleaseEscrow,
}

impl OperationName {
    /// Every operation, in contract order
    pub const ALL: [OperationName; 12] = [
        OperationName::CreateAsset,
        OperationName::GetAsset,
        OperationName::GetMinimumPrice,
        OperationName::MakeOffer,
        OperationName::GetOfferPrice,
        OperationName::AcceptOffer,
        OperationName::RejectOffer,
        OperationName::SubmitInspectionReport,
        OperationName::GetInspectionReport,
        OperationName::FundEscrow,
        OperationName::PropertyTransfer,
        OperationName::ReleaseEscrow,
    ];

    /// Contract name, as used on the command line and in logs
    pub fn as_str(self) -> &'static str {
        match self {
            OperationName::CreateAsset => "createAsset",
            OperationName::GetAsset => "getAsset",
            OperationName::GetMinimumPrice => "getMinimumPrice",
            OperationName::MakeOffer => "makeOffer",
            OperationName::GetOfferPrice => "getOfferPrice",
            OperationName::AcceptOffer => "acceptOffer",
            OperationName::RejectOffer => "rejectOffer",
            OperationName::SubmitInspectionReport => "submitInspectionReport",
            OperationName::GetInspectionReport => "getInspectionReport",
            OperationName::FundEscrow => "fundEscrow",
            OperationName::PropertyTransfer => "propertyTransfer",
            OperationName::ReleaseEscrow => "releaseEscrow",
        }
    }

    /// Read-only (evaluated) as opposed to submitted
    pub fn is_query(self) -> bool {
        matches!(
            self,
            OperationName::GetAsset
                | OperationName::GetMinimumPrice
                | OperationName::GetOfferPrice
                | OperationName::GetInspectionReport
        )
    }

    fn arity(self) -> &'static [usize] {
        match self {
            OperationName::CreateAsset => &[2, 3],
            OperationName::MakeOffer | OperationName::SubmitInspectionReport => &[3],
            _ => &[1],
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationName {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self> {
        OperationName::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| EstateError::invalid(format!("unknown operation: {s}")))
    }
}

/// A fully typed operation invocation
///
/// Variants and fields mirror the arguments of the matching
/// [`AssetLifecycle`] method.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    CreateAsset {
        asset_id: Option<AssetId>,
        seller: String,
        minimum_price: Amount,
    },
    GetAsset {
        asset_id: AssetId,
    },
    GetMinimumPrice {
        asset_id: AssetId,
    },
    MakeOffer {
        asset_id: AssetId,
        buyer: String,
        offer_price: Amount,
    },
    GetOfferPrice {
        asset_id: AssetId,
    },
    AcceptOffer {
        asset_id: AssetId,
    },
    RejectOffer {
        asset_id: AssetId,
    },
    SubmitInspectionReport {
        asset_id: AssetId,
        inspector: String,
        handle: ReportHandle,
    },
    GetInspectionReport {
        asset_id: AssetId,
    },
    FundEscrow {
        asset_id: AssetId,
    },
    PropertyTransfer {
        asset_id: AssetId,
    },
    ReleaseEscrow {
        asset_id: AssetId,
    },
}

impl ContractCall {
    /// Operation this call invokes
    pub fn name(&self) -> OperationName {
        match self {
            ContractCall::CreateAsset { .. } => OperationName::CreateAsset,
            ContractCall::GetAsset { .. } => OperationName::GetAsset,
            ContractCall::GetMinimumPrice { .. } => OperationName::GetMinimumPrice,
            ContractCall::MakeOffer { .. } => OperationName::MakeOffer,
            ContractCall::GetOfferPrice { .. } => OperationName::GetOfferPrice,
            ContractCall::AcceptOffer { .. } => OperationName::AcceptOffer,
            ContractCall::RejectOffer { .. } => OperationName::RejectOffer,
            ContractCall::SubmitInspectionReport { .. } => OperationName::SubmitInspectionReport,
            ContractCall::GetInspectionReport { .. } => OperationName::GetInspectionReport,
            ContractCall::FundEscrow { .. } => OperationName::FundEscrow,
            ContractCall::PropertyTransfer { .. } => OperationName::PropertyTransfer,
            ContractCall::ReleaseEscrow { .. } => OperationName::ReleaseEscrow,
        }
    }

    /// Build a call from positional string arguments, in contract order
    ///
    /// `createAsset` takes `[assetId,] seller, offerPrice`; the two-argument
    /// form leaves the id to the lifecycle.
    pub fn from_args(name: OperationName, args: &[String]) -> Result<Self> {
        if !name.arity().contains(&args.len()) {
            return Err(EstateError::invalid(format!(
                "{name} expects {:?} argument(s), got {}",
                name.arity(),
                args.len()
            )));
        }

        let asset_id = || AssetId::parse(&args[0]);
        let call = match name {
            OperationName::CreateAsset => {
                let (asset_id, rest) = match args {
                    [id, rest @ ..] if args.len() == 3 => (Some(AssetId::parse(id)?), rest),
                    _ => (None, args),
                };
                ContractCall::CreateAsset {
                    asset_id,
                    seller: rest[0].clone(),
                    minimum_price: Amount::parse(&rest[1])?,
                }
            }
            OperationName::GetAsset => ContractCall::GetAsset {
                asset_id: asset_id()?,
            },
            OperationName::GetMinimumPrice => ContractCall::GetMinimumPrice {
                asset_id: asset_id()?,
            },
            OperationName::MakeOffer => ContractCall::MakeOffer {
                asset_id: asset_id()?,
                buyer: args[1].clone(),
                offer_price: Amount::parse(&args[2])?,
            },
            OperationName::GetOfferPrice => ContractCall::GetOfferPrice {
                asset_id: asset_id()?,
            },
            OperationName::AcceptOffer => ContractCall::AcceptOffer {
                asset_id: asset_id()?,
            },
            OperationName::RejectOffer => ContractCall::RejectOffer {
                asset_id: asset_id()?,
            },
            OperationName::SubmitInspectionReport => ContractCall::SubmitInspectionReport {
                asset_id: asset_id()?,
                inspector: args[1].clone(),
                handle: ReportHandle::parse(&args[2])?,
            },
            OperationName::GetInspectionReport => ContractCall::GetInspectionReport {
                asset_id: asset_id()?,
            },
            OperationName::FundEscrow => ContractCall::FundEscrow {
                asset_id: asset_id()?,
            },
            OperationName::PropertyTransfer => ContractCall::PropertyTransfer {
                asset_id: asset_id()?,
            },
            OperationName::ReleaseEscrow => ContractCall::ReleaseEscrow {
                asset_id: asset_id()?,
            },
        };
        Ok(call)
    }
}

/// Result of a dispatched call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum CallOutcome {
    /// Id of the listed asset
    Created(AssetId),
    /// Minimum or offered price
    Price(Amount),
    /// Stored report handle
    Handle(ReportHandle),
    /// Full record
    Asset(AssetRecord),
    /// Mutation committed
    Done,
}

impl<L: LedgerEffects> AssetLifecycle<L> {
    /// Route a call to its lifecycle method
    pub async fn dispatch(&self, call: ContractCall) -> Result<CallOutcome> {
        match call {
            ContractCall::CreateAsset {
                asset_id,
                seller,
                minimum_price,
            } => self
                .create_asset(asset_id, seller, minimum_price)
                .await
                .map(CallOutcome::Created),
            ContractCall::GetAsset { asset_id } => {
                self.get_asset(&asset_id).await.map(CallOutcome::Asset)
            }
            ContractCall::GetMinimumPrice { asset_id } => self
                .get_minimum_price(&asset_id)
                .await
                .map(CallOutcome::Price),
            ContractCall::MakeOffer {
                asset_id,
                buyer,
                offer_price,
            } => self
                .make_offer(&asset_id, buyer, offer_price)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::GetOfferPrice { asset_id } => self
                .get_offer_price(&asset_id)
                .await
                .map(CallOutcome::Price),
            ContractCall::AcceptOffer { asset_id } => self
                .accept_offer(&asset_id)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::RejectOffer { asset_id } => self
                .reject_offer(&asset_id)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::SubmitInspectionReport {
                asset_id,
                inspector,
                handle,
            } => self
                .submit_inspection_report(&asset_id, inspector, handle)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::GetInspectionReport { asset_id } => self
                .get_inspection_report(&asset_id)
                .await
                .map(CallOutcome::Handle),
            ContractCall::FundEscrow { asset_id } => self
                .fund_escrow(&asset_id)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::PropertyTransfer { asset_id } => self
                .property_transfer(&asset_id)
                .await
                .map(|()| CallOutcome::Done),
            ContractCall::ReleaseEscrow { asset_id } => self
                .release_escrow(&asset_id)
                .await
                .map(|()| CallOutcome::Done),
        }
    }
}

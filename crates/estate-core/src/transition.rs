//! Transition table of the asset lifecycle
//!
//! | From | Operation | To |
//! |---|---|---|
//! | (none) | createAsset | available |
//! | available | makeOffer | offerMade |
//! | offerMade | acceptOffer | inspectionPending |
//! | offerMade | rejectOffer | available |
//! | inspectionPending | submitInspectionReport | inspectionComplete |
//! | inspectionComplete | fundEscrow | escrowFunded |
//! | escrowFunded | propertyTransfer | propertyTransferred |
//! | propertyTransferred | releaseEscrow | completed |
//!
//! `makeOffer` may additionally be accepted from other states depending on
//! the configured [`OfferPolicy`]. [`apply`] is pure: it checks the
//! precondition against the record it is given and returns a new record.

use crate::errors::{EstateError, Result};
use crate::operation::OperationName;
use crate::policy::OfferPolicy;
use crate::types::{Amount, AssetRecord, AssetStatus, ReportHandle};

/// A status-changing step applied to an existing record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Record a buyer and the proposed price
    MakeOffer {
        /// Offering party
        buyer: String,
        /// Proposed price
        price: Amount,
    },
    /// Accept the pending offer
    AcceptOffer,
    /// Drop the pending offer and relist
    RejectOffer,
    /// Attach the inspector and the stored report; allowed once per asset
    SubmitInspectionReport {
        /// Inspecting party
        inspector: String,
        /// Object-store handle of the report
        handle: ReportHandle,
    },
    /// Buyer funds escrow
    FundEscrow,
    /// Title moves to the buyer
    PropertyTransfer,
    /// Escrow is paid out to the seller
    ReleaseEscrow,
}

impl Transition {
    /// Contract operation implementing this step
    pub fn operation(&self) -> OperationName {
        match self {
            Transition::MakeOffer { .. } => OperationName::MakeOffer,
            Transition::AcceptOffer => OperationName::AcceptOffer,
            Transition::RejectOffer => OperationName::RejectOffer,
            Transition::SubmitInspectionReport { .. } => OperationName::SubmitInspectionReport,
            Transition::FundEscrow => OperationName::FundEscrow,
            Transition::PropertyTransfer => OperationName::PropertyTransfer,
            Transition::ReleaseEscrow => OperationName::ReleaseEscrow,
        }
    }

    /// Required status, or `None` when the offer policy decides
    pub fn required_status(&self) -> Option<AssetStatus> {
        match self {
            Transition::MakeOffer { .. } => None,
            Transition::AcceptOffer | Transition::RejectOffer => Some(AssetStatus::OfferMade),
            Transition::SubmitInspectionReport { .. } => Some(AssetStatus::InspectionPending),
            Transition::FundEscrow => Some(AssetStatus::InspectionComplete),
            Transition::PropertyTransfer => Some(AssetStatus::EscrowFunded),
            Transition::ReleaseEscrow => Some(AssetStatus::PropertyTransferred),
        }
    }

    /// Status of the record after the step succeeds
    pub fn target_status(&self) -> AssetStatus {
        match self {
            Transition::MakeOffer { .. } => AssetStatus::OfferMade,
            Transition::AcceptOffer => AssetStatus::InspectionPending,
            Transition::RejectOffer => AssetStatus::Available,
            Transition::SubmitInspectionReport { .. } => AssetStatus::InspectionComplete,
            Transition::FundEscrow => AssetStatus::EscrowFunded,
            Transition::PropertyTransfer => AssetStatus::PropertyTransferred,
            Transition::ReleaseEscrow => AssetStatus::Completed,
        }
    }

    fn permits(&self, from: AssetStatus, offers: OfferPolicy) -> bool {
        match self.required_status() {
            Some(required) => from == required,
            None => offers.permits(from),
        }
    }

    fn violation(&self, record: &AssetRecord) -> EstateError {
        let message = match self {
            Transition::MakeOffer { .. } => format!(
                "Offers cannot be made for asset {} while it is {}",
                record.asset_id(),
                record.status()
            ),
            Transition::AcceptOffer => "No valid offer made to accept".to_string(),
            Transition::RejectOffer => "No valid offer to reject".to_string(),
            Transition::SubmitInspectionReport { .. } => {
                "Inspection cannot proceed before offer acceptance".to_string()
            }
            Transition::FundEscrow => {
                "Escrow cannot be funded before inspection completion".to_string()
            }
            Transition::PropertyTransfer => {
                "Property cannot be transferred before escrow funding".to_string()
            }
            Transition::ReleaseEscrow => {
                "Escrow cannot be released before property transfer".to_string()
            }
        };
        EstateError::invalid_state(message)
    }
}

/// Check the precondition of `transition` and return the resulting record
pub fn apply(
    record: &AssetRecord,
    transition: &Transition,
    offers: OfferPolicy,
) -> Result<AssetRecord> {
    if !transition.permits(record.status(), offers) {
        return Err(transition.violation(record));
    }
    // A report handle, once recorded, is never replaced. Permissive offer
    // policies can lead an inspected asset back to `inspectionPending`.
    if matches!(transition, Transition::SubmitInspectionReport { .. })
        && !record.report_handle().is_empty()
    {
        return Err(EstateError::invalid_state(format!(
            "Inspection report already submitted for asset {}",
            record.asset_id()
        )));
    }

    let next = match transition {
        Transition::MakeOffer { buyer, price } => record.with_offer(buyer.clone(), *price),
        Transition::RejectOffer => record.without_offer(),
        Transition::SubmitInspectionReport { inspector, handle } => {
            record.with_inspection(inspector.clone(), handle.clone())
        }
        other => record.with_status(other.target_status()),
    };

    debug_assert_eq!(next.status(), transition.target_status());
    Ok(next)
}

/// One edge of the lifecycle graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// `None` for creation
    pub from: Option<AssetStatus>,
    /// Operation taking the edge
    pub operation: OperationName,
    /// Resulting status
    pub to: AssetStatus,
}

/// Every edge reachable under `offers`
pub fn allowed_edges(offers: OfferPolicy) -> Vec<Edge> {
    let mut edges = vec![Edge {
        from: None,
        operation: OperationName::CreateAsset,
        to: AssetStatus::Available,
    }];

    edges.extend(
        AssetStatus::ALL
            .into_iter()
            .filter(|status| offers.permits(*status))
            .map(|from| Edge {
                from: Some(from),
                operation: OperationName::MakeOffer,
                to: AssetStatus::OfferMade,
            }),
    );

    let guarded = [
        Transition::AcceptOffer,
        Transition::RejectOffer,
        Transition::SubmitInspectionReport {
            inspector: String::new(),
            handle: ReportHandle::empty(),
        },
        Transition::FundEscrow,
        Transition::PropertyTransfer,
        Transition::ReleaseEscrow,
    ];
    edges.extend(guarded.iter().filter_map(|t| {
        t.required_status().map(|from| Edge {
            from: Some(from),
            operation: t.operation(),
            to: t.target_status(),
        })
    }));

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::types::AssetId;

    fn record_in(status: AssetStatus) -> AssetRecord {
        AssetRecord::new(AssetId::parse("123456").unwrap(), "sellerId", Amount::new(100_000))
            .with_status(status)
    }

    #[test]
    fn test_fund_escrow_requires_inspection_complete() {
        let err = apply(
            &record_in(AssetStatus::Available),
            &Transition::FundEscrow,
            OfferPolicy::Strict,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            err.to_string(),
            "Escrow cannot be funded before inspection completion"
        );

        let funded = apply(
            &record_in(AssetStatus::InspectionComplete),
            &Transition::FundEscrow,
            OfferPolicy::Strict,
        )
        .unwrap();
        assert_eq!(funded.status(), AssetStatus::EscrowFunded);
    }

    #[test]
    fn test_reject_clears_offer() {
        let offered = record_in(AssetStatus::Available).with_offer("buyerId", Amount::new(95_000));
        let rejected = apply(&offered, &Transition::RejectOffer, OfferPolicy::Strict).unwrap();
        assert_eq!(rejected.buyer(), "");
        assert_eq!(rejected.offer_price(), Amount::ZERO);
        assert_eq!(rejected.status(), AssetStatus::Available);
    }

    #[test]
    fn test_strict_offer_policy_rejects_reoffer() {
        let offered = record_in(AssetStatus::OfferMade);
        let offer = Transition::MakeOffer {
            buyer: "other".into(),
            price: Amount::new(1),
        };
        assert!(apply(&offered, &offer, OfferPolicy::Strict).is_err());
        assert!(apply(&offered, &offer, OfferPolicy::Negotiation).is_ok());
    }

    #[test]
    fn test_strict_edges_match_table() {
        let edges = allowed_edges(OfferPolicy::Strict);
        assert_eq!(edges.len(), 8);
        assert!(edges.contains(&Edge {
            from: Some(AssetStatus::OfferMade),
            operation: OperationName::RejectOffer,
            to: AssetStatus::Available,
        }));
    }

    #[test]
    fn test_report_handle_is_never_replaced() {
        let inspection = |handle: &str| Transition::SubmitInspectionReport {
            inspector: "inspectorId".into(),
            handle: ReportHandle::new(handle),
        };
        let inspected = apply(
            &record_in(AssetStatus::InspectionPending),
            &inspection("H1"),
            OfferPolicy::Unrestricted,
        )
        .unwrap();

        // back in inspectionPending through a permissive re-offer
        let pending = inspected
            .with_offer("buyerQ", Amount::new(90_000))
            .with_status(AssetStatus::InspectionPending);
        let err = apply(&pending, &inspection("H2"), OfferPolicy::Unrestricted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            err.to_string(),
            "Inspection report already submitted for asset 123456"
        );
        assert_eq!(pending.report_handle().as_str(), "H1");
    }
}

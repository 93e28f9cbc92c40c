//! Asset lifecycle service
//!
//! Every mutating operation is one read-modify-write of a single ledger key:
//! read the record and its version, check the precondition, build the new
//! record value, encode it and write it back on the condition that the key is
//! still at the version that was read. A concurrent writer therefore makes
//! the later commit fail with `Conflict` instead of interleaving. Nothing is
//! retried, and no operation touches any key other than its own asset id.

use crate::effects::{LedgerEffects, WriteCondition};
use crate::errors::{EstateError, Result};
use crate::policy::{AssetIdPolicy, LifecyclePolicy};
use crate::serialization::{decode_record, encode_record};
use crate::transition::{self, Transition};
use crate::types::{Amount, AssetId, AssetRecord, AssetStatus, ReportHandle};
use tracing::{debug, info};

/// The lifecycle state machine bound to a ledger
#[derive(Debug, Clone)]
pub struct AssetLifecycle<L> {
    ledger: L,
    policy: LifecyclePolicy,
}

impl<L: LedgerEffects> AssetLifecycle<L> {
    /// Bind `policy` to `ledger`
    pub fn new(ledger: L, policy: LifecyclePolicy) -> Self {
        Self { ledger, policy }
    }

    /// Active policy
    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// List a new asset in `available` with its minimum price
    ///
    /// Under [`AssetIdPolicy::CallerSupplied`] the id is required and an
    /// existing key fails with `AlreadyExists`. Under
    /// [`AssetIdPolicy::Generated`] a fresh id is generated and a supplied one
    /// is rejected. A key holding an empty value reads as absent everywhere,
    /// so creation overwrites it at the version that was read.
    pub async fn create_asset(
        &self,
        asset_id: Option<AssetId>,
        seller: impl Into<String>,
        minimum_price: Amount,
    ) -> Result<AssetId> {
        let asset_id = match (self.policy.asset_ids, asset_id) {
            (AssetIdPolicy::CallerSupplied, Some(id)) => id,
            (AssetIdPolicy::CallerSupplied, None) => {
                return Err(EstateError::invalid("assetId is required"))
            }
            (AssetIdPolicy::Generated, None) => AssetId::generate(),
            (AssetIdPolicy::Generated, Some(id)) => {
                return Err(EstateError::invalid(format!(
                    "assetId {id} was supplied but ids are generated by the ledger"
                )))
            }
        };

        let record = AssetRecord::new(asset_id.clone(), seller, minimum_price);
        let bytes = encode_record(&record)?;

        let condition = match self.ledger.get_versioned(asset_id.as_str()).await? {
            Some(entry) if entry.value.is_empty() => WriteCondition::Version(entry.version),
            _ => WriteCondition::Absent,
        };

        match self
            .ledger
            .put_versioned(asset_id.as_str(), bytes, condition)
            .await
        {
            Ok(_) => {}
            Err(EstateError::Conflict { .. }) => {
                debug!(asset_id = %asset_id, "create rejected: key exists");
                return Err(EstateError::already_exists(format!(
                    "The asset {asset_id} already exists"
                )));
            }
            Err(e) => return Err(e),
        }

        info!(
            asset_id = %asset_id,
            seller = record.seller(),
            minimum_price = %minimum_price,
            "asset created"
        );
        Ok(asset_id)
    }

    /// Full record of an asset
    pub async fn get_asset(&self, asset_id: &AssetId) -> Result<AssetRecord> {
        self.load(asset_id).await.map(|(record, _)| record)
    }

    /// Seller's minimum price; only while `available`
    pub async fn get_minimum_price(&self, asset_id: &AssetId) -> Result<Amount> {
        let record = self.get_asset(asset_id).await?;
        if record.status() != AssetStatus::Available {
            return Err(EstateError::invalid_state(format!(
                "No minimum price available for asset {asset_id}"
            )));
        }
        Ok(record.offer_price())
    }

    /// Record a buyer's offer and move to `offerMade`
    pub async fn make_offer(
        &self,
        asset_id: &AssetId,
        buyer: impl Into<String>,
        offer_price: Amount,
    ) -> Result<()> {
        self.transition(
            asset_id,
            Transition::MakeOffer {
                buyer: buyer.into(),
                price: offer_price,
            },
        )
        .await
    }

    /// Pending offer price; only while `offerMade`
    pub async fn get_offer_price(&self, asset_id: &AssetId) -> Result<Amount> {
        let record = self.get_asset(asset_id).await?;
        if record.status() != AssetStatus::OfferMade {
            return Err(EstateError::invalid_state(format!(
                "No valid offer made for asset {asset_id}"
            )));
        }
        Ok(record.offer_price())
    }

    /// Accept the pending offer; moves to `inspectionPending`
    pub async fn accept_offer(&self, asset_id: &AssetId) -> Result<()> {
        self.transition(asset_id, Transition::AcceptOffer).await
    }

    /// Reset buyer and offer price and return to `available`
    pub async fn reject_offer(&self, asset_id: &AssetId) -> Result<()> {
        self.transition(asset_id, Transition::RejectOffer).await
    }

    /// Record the inspector and the object-store handle of the report
    ///
    /// An empty handle is rejected with `Invalid` before the record is read.
    pub async fn submit_inspection_report(
        &self,
        asset_id: &AssetId,
        inspector: impl Into<String>,
        handle: ReportHandle,
    ) -> Result<()> {
        if handle.as_str().trim().is_empty() {
            return Err(EstateError::invalid("report handle cannot be empty"));
        }
        self.transition(
            asset_id,
            Transition::SubmitInspectionReport {
                inspector: inspector.into(),
                handle,
            },
        )
        .await
    }

    /// Handle of the stored inspection report
    pub async fn get_inspection_report(&self, asset_id: &AssetId) -> Result<ReportHandle> {
        let record = self.get_asset(asset_id).await?;
        if record.report_handle().is_empty() {
            return Err(EstateError::not_found(format!(
                "No inspection report found for asset {asset_id}"
            )));
        }
        Ok(record.report_handle().clone())
    }

    /// Buyer funds escrow after the inspection
    pub async fn fund_escrow(&self, asset_id: &AssetId) -> Result<()> {
        self.transition(asset_id, Transition::FundEscrow).await
    }

    /// Seller transfers the property once escrow is funded
    pub async fn property_transfer(&self, asset_id: &AssetId) -> Result<()> {
        self.transition(asset_id, Transition::PropertyTransfer).await
    }

    /// Release escrow to the seller; moves to `completed`
    pub async fn release_escrow(&self, asset_id: &AssetId) -> Result<()> {
        self.transition(asset_id, Transition::ReleaseEscrow).await
    }

    async fn load(&self, asset_id: &AssetId) -> Result<(AssetRecord, u64)> {
        let entry = self
            .ledger
            .get_versioned(asset_id.as_str())
            .await?
            .filter(|entry| !entry.value.is_empty())
            .ok_or_else(|| EstateError::not_found(format!("The asset {asset_id} does not exist")))?;

        let record = decode_record(&entry.value)?;
        Ok((record, entry.version))
    }

    async fn transition(&self, asset_id: &AssetId, step: Transition) -> Result<()> {
        let (current, version) = self.load(asset_id).await?;

        let next = match transition::apply(&current, &step, self.policy.offers) {
            Ok(next) => next,
            Err(e) => {
                debug!(
                    asset_id = %asset_id,
                    operation = %step.operation(),
                    status = %current.status(),
                    "precondition failed"
                );
                return Err(e);
            }
        };

        self.ledger
            .put_versioned(
                asset_id.as_str(),
                encode_record(&next)?,
                WriteCondition::Version(version),
            )
            .await?;

        info!(
            asset_id = %asset_id,
            operation = %step.operation(),
            from = %current.status(),
            to = %next.status(),
            "asset transitioned"
        );
        Ok(())
    }
}

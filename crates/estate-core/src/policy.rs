//! Policy choices the lifecycle leaves open
//!
//! Two behaviours diverged between deployed contract variants: how asset ids
//! are assigned, and from which states a buyer may make an offer. Both are
//! explicit configuration here instead of being merged.

use crate::types::AssetStatus;
use serde::{Deserialize, Serialize};

/// How `createAsset` obtains the asset id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetIdPolicy {
    /// Caller supplies the id; an existing key fails with `AlreadyExists`
    #[default]
    CallerSupplied,
    /// The lifecycle generates a UUID and returns it; supplied ids are rejected
    Generated,
}

/// States from which `makeOffer` is accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferPolicy {
    /// Only `available`
    #[default]
    Strict,
    /// `available` or `offerMade` (counter offers replace the pending one)
    Negotiation,
    /// Anything but `completed`
    NonTerminal,
    /// Any status, including `completed`
    Unrestricted,
}

impl OfferPolicy {
    /// Whether an offer may be made while the asset is in `status`
    pub fn permits(self, status: AssetStatus) -> bool {
        match self {
            OfferPolicy::Strict => status == AssetStatus::Available,
            OfferPolicy::Negotiation => {
                matches!(status, AssetStatus::Available | AssetStatus::OfferMade)
            }
            OfferPolicy::NonTerminal => !status.is_terminal(),
            OfferPolicy::Unrestricted => true,
        }
    }
}

/// Combined lifecycle policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    /// Id assignment on creation
    pub asset_ids: AssetIdPolicy,
    /// States accepting `makeOffer`
    pub offers: OfferPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_policies_widen_monotonically() {
        let count = |policy: OfferPolicy| {
            AssetStatus::ALL
                .into_iter()
                .filter(|s| policy.permits(*s))
                .count()
        };
        assert_eq!(count(OfferPolicy::Strict), 1);
        assert_eq!(count(OfferPolicy::Negotiation), 2);
        assert_eq!(count(OfferPolicy::NonTerminal), 6);
        assert_eq!(count(OfferPolicy::Unrestricted), 7);
    }

    #[test]
    fn test_policy_value_names() {
        let policy: LifecyclePolicy =
            serde_json::from_str(r#"{"asset_ids":"generated","offers":"non-terminal"}"#).unwrap();
        assert_eq!(policy.asset_ids, AssetIdPolicy::Generated);
        assert_eq!(policy.offers, OfferPolicy::NonTerminal);
        assert_eq!(
            serde_json::from_str::<LifecyclePolicy>("{}").unwrap(),
            LifecyclePolicy::default()
        );
    }
}

//! Estate Core - asset lifecycle for real-estate transactions
//!
//! A listed property moves through three phases:
//!
//! 1. **Negotiation**: the seller lists a minimum price (`createAsset`), a
//!    buyer offers (`makeOffer`), the seller accepts or rejects.
//! 2. **Inspection**: an inspector submits a report, stored in a
//!    content-addressed object store; only its handle lands in the record.
//! 3. **Escrow**: the buyer funds escrow, the seller transfers the property,
//!    escrow is released.
//!
//! The crate holds the record model, the transition table, the lifecycle
//! service and the effect traits for the two external collaborators (ledger
//! and object store). Concrete handlers live in `estate-effects`; the HTTP
//! surface lives in `estate-gateway`.

#![forbid(unsafe_code)]

/// Collaborator interfaces (ledger, object store)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Lifecycle service over a ledger
pub mod lifecycle;

/// Operation names, typed calls and dispatch
pub mod operation;

/// Id assignment and offer policies
pub mod policy;

/// Ledger encoding of records
pub mod serialization;

/// Transition table
pub mod transition;

/// Record model
pub mod types;

pub use effects::{LedgerEffects, ObjectStoreEffects, Versioned, WriteCondition};
pub use errors::{ErrorKind, EstateError, Result};
pub use lifecycle::AssetLifecycle;
pub use operation::{CallOutcome, ContractCall, OperationName};
pub use policy::{AssetIdPolicy, LifecyclePolicy, OfferPolicy};
pub use types::{Amount, AssetId, AssetRecord, AssetStatus, ReportHandle};

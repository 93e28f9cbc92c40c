//! Estate Effects - handlers for the lifecycle's collaborators
//!
//! Implements the effect traits from `estate-core`:
//!
//! - [`ledger`]: versioned key-value ledger, in memory or on the filesystem
//! - [`object_store`]: content-addressed blob store for inspection reports,
//!   in memory or on the filesystem
//!
//! Memory handlers back tests and single-process demos; filesystem handlers
//! persist across restarts.

#![forbid(unsafe_code)]

/// Versioned key-value ledgers
pub mod ledger;

/// Content-addressed report storage
pub mod object_store;

pub use ledger::{FilesystemLedger, MemoryLedger};
pub use object_store::{content_handle, FilesystemObjectStore, MemoryObjectStore};

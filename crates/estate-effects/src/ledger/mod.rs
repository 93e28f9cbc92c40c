//! Ledger handlers
//!
//! Both handlers keep a version per key and commit a write only when its
//! [`WriteCondition`](estate_core::WriteCondition) holds against the version
//! observed inside the same critical section.

mod filesystem;
mod memory;

pub use filesystem::FilesystemLedger;
pub use memory::MemoryLedger;

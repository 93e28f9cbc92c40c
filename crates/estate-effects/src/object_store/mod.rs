//! Content-addressed object store handlers
//!
//! A handle is the lowercase hex BLAKE3 digest of the stored bytes. Equal
//! content therefore yields equal handles, and a stored object can be checked
//! against its handle on every read.

mod filesystem;
mod memory;

pub use filesystem::FilesystemObjectStore;
pub use memory::MemoryObjectStore;

use estate_core::{EstateError, ReportHandle};

/// Length of a hex-encoded BLAKE3 digest
const HANDLE_LEN: usize = 64;

/// Handle under which `data` is stored
pub fn content_handle(data: &[u8]) -> ReportHandle {
    ReportHandle::new(blake3::hash(data).to_hex().to_string())
}

/// Whether `handle` could have been produced by [`content_handle`]
pub(crate) fn is_well_formed(handle: &ReportHandle) -> bool {
    let raw = handle.as_str();
    raw.len() == HANDLE_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

pub(crate) fn unknown_handle(handle: &ReportHandle) -> EstateError {
    EstateError::not_found(format!("No object stored under handle {handle}"))
}

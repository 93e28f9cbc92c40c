//! Unified error type for asset lifecycle operations
//!
//! Every lifecycle operation fails synchronously with one of these variants and
//! the error is propagated unchanged to the caller. Transport concerns (status
//! codes, response bodies) belong to the gateway, not here.

use serde::{Deserialize, Serialize};

/// Error type for all estate operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum EstateError {
    /// Asset, key or content handle absent
    #[error("{message}")]
    NotFound {
        /// What was looked up
        message: String,
    },

    /// Duplicate asset creation
    #[error("{message}")]
    AlreadyExists {
        /// Which asset already exists
        message: String,
    },

    /// Status precondition violated
    #[error("{message}")]
    InvalidState {
        /// The violated precondition
        message: String,
    },

    /// Malformed input
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Ledger rejected a write because the record changed since it was read
    #[error("Conflict: {message}")]
    Conflict {
        /// Key and versions involved
        message: String,
    },

    /// Ledger or object store I/O failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Record could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

/// Fieldless discriminant of [`EstateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// [`EstateError::NotFound`]
    NotFound,
    /// [`EstateError::AlreadyExists`]
    AlreadyExists,
    /// [`EstateError::InvalidState`]
    InvalidState,
    /// [`EstateError::Invalid`]
    Invalid,
    /// [`EstateError::Conflict`]
    Conflict,
    /// [`EstateError::Storage`]
    Storage,
    /// [`EstateError::Serialization`]
    Serialization,
}

impl EstateError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a write conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// The variant without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Invalid { .. } => ErrorKind::Invalid,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Serialization { .. } => ErrorKind::Serialization,
        }
    }
}

impl From<serde_json::Error> for EstateError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Standard Result type for estate operations
pub type Result<T> = std::result::Result<T, EstateError>;

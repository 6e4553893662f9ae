//! Store error taxonomy.

use thiserror::Error;

use quill_core::ledger::LedgerError;

/// Errors surfaced by entity store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "account".
        entity: &'static str,
        /// The missing ID, rendered for the message.
        id: String,
    },

    /// A uniqueness or state conflict on write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Compare-and-set failed because another writer got there first.
    #[error("version mismatch: expected {expected}, found {actual}")]
    VersionMismatch {
        /// The version the caller read.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },

    /// A domain invariant was violated at the store boundary.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The backend itself failed (connectivity, serialization, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Shorthand for a typed not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// A stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::VersionMismatch { .. } => "VERSION_MISMATCH",
            Self::Ledger(_) => "LEDGER_VIOLATION",
            Self::Backend(_) => "BACKEND_ERROR",
        }
    }

    /// Whether the caller may retry the write after re-reading.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }
}

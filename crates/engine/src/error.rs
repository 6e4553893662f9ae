//! Engine error taxonomy.

use thiserror::Error;

use quill_core::document::ValidationError;
use quill_shared::types::AccountId;
use quill_store::StoreError;

/// Errors surfaced by the posting and reversal engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store operation failed outside a saga step.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Balance CAS kept losing races past the retry budget.
    #[error("balance update on account {account} conflicted {attempts} times, giving up")]
    BalanceConflict {
        /// The contended account.
        account: AccountId,
        /// How many attempts were made.
        attempts: u32,
    },

    /// A multi-step write failed partway; earlier steps are already
    /// persisted and the document needs a reconcile pass.
    #[error("posting {document} failed at step '{failed_step}' after {} completed steps: {source}", completed.len())]
    PartialFailure {
        /// The number of the document being posted or reversed.
        document: String,
        /// Step names that finished before the failure.
        completed: Vec<&'static str>,
        /// The step that failed.
        failed_step: &'static str,
        /// Planned steps that never ran.
        remaining: Vec<&'static str>,
        /// The underlying failure.
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// A stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Store(_) => "STORE_ERROR",
            Self::BalanceConflict { .. } => "BALANCE_CONFLICT",
            Self::PartialFailure { .. } => "PARTIAL_FAILURE",
        }
    }
}

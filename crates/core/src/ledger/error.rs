//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use quill_shared::types::{AccountId, JournalEntryId};

/// Errors raised by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry debits and credits differ by more than the tolerance.
    ///
    /// The posting engine never constructs such an entry, so reaching this
    /// is an internal defect rather than a user-recoverable condition.
    #[error("journal entry {reference} is unbalanced: debit {debit}, credit {credit}")]
    UnbalancedEntry {
        /// Reference of the offending entry (document number).
        reference: String,
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Account not found.
    ///
    /// Expected for orphaned journal lines; callers handle it rather than
    /// treating it as fatal.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Journal entry not found.
    #[error("journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::UnbalancedEntry {
                reference: "INV-1".to_string(),
                debit: dec!(100),
                credit: dec!(90),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::EntryNotFound(JournalEntryId::new()).error_code(),
            "ENTRY_NOT_FOUND"
        );
    }

    #[test]
    fn test_unbalanced_display_names_the_document() {
        let err = LedgerError::UnbalancedEntry {
            reference: "BILL-042".to_string(),
            debit: dec!(110.00),
            credit: dec!(100.00),
        };
        assert_eq!(
            err.to_string(),
            "journal entry BILL-042 is unbalanced: debit 110.00, credit 100.00"
        );
    }
}

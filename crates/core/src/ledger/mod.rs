//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Chart of accounts entries with type-based polarity
//! - Journal entries (balanced multi-line postings)
//! - Balance projection and running-balance ledger views
//! - Error types for ledger operations

pub mod account;
pub mod entry;
pub mod error;
pub mod projection;

#[cfg(test)]
mod projection_props;

pub use account::{Account, AccountType};
pub use entry::{
    EntryStatus, JournalEntry, JournalLine, NewJournalEntry, SourceType, balance_tolerance,
};
pub use error::LedgerError;
pub use projection::{LedgerRow, TrialBalance, ledger_view, project_balances, trial_balance};

//! Core double-entry posting logic for Quill.
//!
//! Pure business logic with no store or transport dependencies:
//! - Chart of accounts and debit/credit polarity
//! - Journal entries and the balanced-entry invariant
//! - Balance projection (full recomputation and incremental deltas)
//! - Source documents and the posting state machine
//! - Posting plan derivation (journal lines + inventory movements)
//! - Inventory domain records

pub mod document;
pub mod inventory;
pub mod ledger;
pub mod posting;

#[cfg(test)]
mod posting_props;

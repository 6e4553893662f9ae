//! Journal entries: balanced multi-line postings linked to source documents.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quill_shared::types::{AccountId, CompanyId, DocumentId, JournalEntryId, UserId};

use super::account::Account;

/// Tolerance for the balanced-entry check (debits vs credits).
///
/// Amounts are produced by per-line rounding, so totals may differ by less
/// than one cent without indicating a logic error.
#[must_use]
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// The kind of source document a journal entry was posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Sales invoice.
    Invoice,
    /// Vendor bill.
    Bill,
    /// Bill payment.
    Payment,
    /// Manually keyed entry.
    Manual,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
            Self::Payment => "payment",
            Self::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Journal entry status.
///
/// Drafts are not modeled here: an entry exists only once posted, and
/// "editing" a posting is implemented as delete-old + create-new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Posted to the ledger (immutable except for deletion).
    Posted,
}

/// A single debit or credit line within a journal entry.
///
/// Account code and name are denormalized snapshots taken at posting time so
/// ledger views survive later renames of the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account posted to.
    pub account_id: AccountId,
    /// Account code snapshot.
    pub account_code: String,
    /// Account name snapshot.
    pub account_name: String,
    /// Line description.
    pub description: String,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
}

impl JournalLine {
    /// Creates a debit line against the given account.
    #[must_use]
    pub fn debit(account: &Account, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            description: description.into(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line against the given account.
    #[must_use]
    pub fn credit(account: &Account, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            description: description.into(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Input for creating a journal entry.
///
/// The store assigns the entry id, the per-company sequential entry number,
/// and the posted timestamp.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// The company the entry belongs to.
    pub company_id: CompanyId,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Free-form reference (typically the source document number).
    pub reference: String,
    /// Kind of document this entry was derived from.
    pub source_type: SourceType,
    /// The source document, when one exists.
    pub source_id: Option<DocumentId>,
    /// Entry description.
    pub description: String,
    /// The debit/credit lines.
    pub lines: Vec<JournalLine>,
    /// The user posting the entry.
    pub posted_by: Option<UserId>,
}

impl NewJournalEntry {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if debits equal credits within [`balance_tolerance`].
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        (self.total_debits() - self.total_credits()).abs() <= balance_tolerance()
    }
}

/// A persisted journal entry.
///
/// Immutable once created except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The entry ID.
    pub id: JournalEntryId,
    /// The company the entry belongs to.
    pub company_id: CompanyId,
    /// Sequential per-company entry number (e.g. "JE-000042").
    pub entry_number: String,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Free-form reference (typically the source document number).
    pub reference: String,
    /// Kind of document this entry was derived from.
    pub source_type: SourceType,
    /// The source document, when one exists. Older records may lack this
    /// linkage, which is why reversal lookups also match on `reference`.
    pub source_id: Option<DocumentId>,
    /// Entry description.
    pub description: String,
    /// Entry status.
    pub status: EntryStatus,
    /// The debit/credit lines.
    pub lines: Vec<JournalLine>,
    /// Cached sum of debit amounts.
    pub total_debits: Decimal,
    /// Cached sum of credit amounts.
    pub total_credits: Decimal,
    /// The user who posted the entry.
    pub posted_by: Option<UserId>,
    /// When the entry was posted.
    pub posted_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Returns true if debits equal credits within [`balance_tolerance`].
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        (self.total_debits - self.total_credits).abs() <= balance_tolerance()
    }
}

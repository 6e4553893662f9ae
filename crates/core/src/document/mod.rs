//! Source documents: bills, invoices, and payments.
//!
//! Documents carry the line items and account selections the posting engine
//! turns into journal entries. Monetary totals are derived values computed
//! from the lines; only `amount_paid` is stored state.

pub mod status;
pub mod validation;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quill_shared::types::{AccountId, CompanyId, DocumentId, JournalEntryId, ProductId};

use crate::ledger::SourceType;

pub use status::{DocumentStatus, PostingAction};
pub use validation::{AccountRole, ValidationError, validate_for_posting};

/// The kind of source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Vendor bill (purchase).
    Bill,
    /// Sales invoice.
    Invoice,
    /// Bill payment.
    Payment,
}

impl DocumentKind {
    /// The journal source type recorded for entries posted from this kind.
    #[must_use]
    pub const fn source_type(self) -> SourceType {
        match self {
            Self::Bill => SourceType::Bill,
            Self::Invoice => SourceType::Invoice,
            Self::Payment => SourceType::Payment,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bill => "bill",
            Self::Invoice => "invoice",
            Self::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// A single line item on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLine {
    /// The referenced product, when the line came from the catalog.
    pub product_id: Option<ProductId>,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price (selling price on invoices, purchase price on bills).
    pub unit_price: Decimal,
    /// Tax rate as a fraction (0.10 for 10%).
    pub tax_rate: Decimal,
}

impl DocumentLine {
    /// Pre-tax amount for this line, rounded to cents.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        (self.quantity * self.unit_price).round_dp(2)
    }

    /// Tax amount for this line, rounded to cents.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        (self.subtotal() * self.tax_rate).round_dp(2)
    }
}

/// Account selections a document carries into posting.
///
/// Which fields are required depends on the document kind; validation
/// enforces the per-kind subset before any persistence happens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAccounts {
    /// Expense or COGS account debited by bills without inventory lines.
    pub expense: Option<AccountId>,
    /// Accounts payable account.
    pub payable: Option<AccountId>,
    /// Accounts receivable account.
    pub receivable: Option<AccountId>,
    /// Revenue account credited by invoices.
    pub revenue: Option<AccountId>,
    /// Tax liability account; required whenever the tax total is nonzero.
    pub tax: Option<AccountId>,
    /// Bank account credited by payments.
    pub bank: Option<AccountId>,
    /// Inventory asset account (bills capitalizing stock, invoice COGS leg).
    pub inventory: Option<AccountId>,
    /// Cost of goods sold account (invoice COGS leg).
    pub cogs: Option<AccountId>,
}

impl DocumentAccounts {
    /// Every selected account ID, for callers resolving the chart rows.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<AccountId> {
        [
            self.expense,
            self.payable,
            self.receivable,
            self.revenue,
            self.tax,
            self.bank,
            self.inventory,
            self.cogs,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A bill, invoice, or payment draft/record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The document ID.
    pub id: DocumentId,
    /// The company the document belongs to.
    pub company_id: CompanyId,
    /// The document kind.
    pub kind: DocumentKind,
    /// Human-facing document number (e.g. "BILL-0042").
    pub number: String,
    /// Document date (becomes the journal entry date).
    pub date: NaiveDate,
    /// Line items.
    pub lines: Vec<DocumentLine>,
    /// Posting account selections.
    pub accounts: DocumentAccounts,
    /// Lifecycle status; gates whether posting occurs.
    pub status: DocumentStatus,
    /// Amount paid so far.
    pub amount_paid: Decimal,
    /// Back-reference to the primary journal entry once posted.
    pub journal_entry_id: Option<JournalEntryId>,
}

impl Document {
    /// Pre-tax total across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(DocumentLine::subtotal).sum()
    }

    /// Total tax across all lines.
    #[must_use]
    pub fn tax_total(&self) -> Decimal {
        self.lines.iter().map(DocumentLine::tax).sum()
    }

    /// Tax-inclusive total.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.subtotal() + self.tax_total()
    }

    /// Remaining balance due.
    #[must_use]
    pub fn balance_due(&self) -> Decimal {
        self.total_amount() - self.amount_paid
    }

    /// Returns true if the current status gates posting on.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        self.status.is_postable(self.kind)
    }
}

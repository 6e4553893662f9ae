//! Pre-posting document validation.
//!
//! Validation runs before any persistence so a rejected document leaves
//! no partial state behind.

use thiserror::Error;

use rust_decimal::Decimal;

use quill_shared::types::AccountId;

use super::{Document, DocumentKind};

/// Account roles a document may need filled before posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// Expense / COGS debit side of a bill.
    Expense,
    /// Accounts payable.
    Payable,
    /// Accounts receivable.
    Receivable,
    /// Revenue.
    Revenue,
    /// Tax liability.
    Tax,
    /// Bank / cash.
    Bank,
    /// Inventory asset.
    Inventory,
    /// Cost of goods sold.
    Cogs,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Expense => "expense",
            Self::Payable => "payable",
            Self::Receivable => "receivable",
            Self::Revenue => "revenue",
            Self::Tax => "tax",
            Self::Bank => "bank",
            Self::Inventory => "inventory",
            Self::Cogs => "cogs",
        };
        f.write_str(name)
    }
}

/// Errors raised when a document cannot be posted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required account role is not selected on the document.
    #[error("{kind} {number} has no {role} account selected")]
    MissingAccount {
        /// The document kind.
        kind: DocumentKind,
        /// The document number.
        number: String,
        /// The missing role.
        role: AccountRole,
    },

    /// The document carries tax but no tax account.
    #[error("{kind} {number} has a nonzero tax total but no tax account")]
    TaxAccountRequired {
        /// The document kind.
        kind: DocumentKind,
        /// The document number.
        number: String,
    },

    /// The document references an account that does not exist.
    #[error("{kind} {number}: selected {role} account {id} was not found")]
    UnknownAccount {
        /// The document kind.
        kind: DocumentKind,
        /// The document number.
        number: String,
        /// The role the account was selected for.
        role: AccountRole,
        /// The dangling account ID.
        id: AccountId,
    },

    /// A line item carries a negative quantity, price, or tax rate.
    #[error("{kind} {number} has a line item with a negative amount")]
    NegativeLineAmount {
        /// The document kind.
        kind: DocumentKind,
        /// The document number.
        number: String,
    },

    /// The document has no line items.
    #[error("{kind} {number} has no line items")]
    NoLineItems {
        /// The document kind.
        kind: DocumentKind,
        /// The document number.
        number: String,
    },
}

impl ValidationError {
    /// A stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::TaxAccountRequired { .. } => "TAX_ACCOUNT_REQUIRED",
            Self::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            Self::NegativeLineAmount { .. } => "NEGATIVE_LINE_AMOUNT",
            Self::NoLineItems { .. } => "NO_LINE_ITEMS",
        }
    }

    pub(crate) fn missing(doc: &Document, role: AccountRole) -> Self {
        Self::MissingAccount {
            kind: doc.kind,
            number: doc.number.clone(),
            role,
        }
    }

    pub(crate) fn unknown(doc: &Document, role: AccountRole, id: AccountId) -> Self {
        Self::UnknownAccount {
            kind: doc.kind,
            number: doc.number.clone(),
            role,
            id,
        }
    }
}

/// Checks a document has every account selection its posting plan needs.
///
/// `has_inventory_lines` is whether any line references an inventory
/// product; the caller resolves that against the product catalog.
pub fn validate_for_posting(doc: &Document, has_inventory_lines: bool) -> Result<(), ValidationError> {
    if doc.lines.is_empty() {
        return Err(ValidationError::NoLineItems {
            kind: doc.kind,
            number: doc.number.clone(),
        });
    }

    if doc.lines.iter().any(|l| {
        l.quantity < Decimal::ZERO || l.unit_price < Decimal::ZERO || l.tax_rate < Decimal::ZERO
    }) {
        return Err(ValidationError::NegativeLineAmount {
            kind: doc.kind,
            number: doc.number.clone(),
        });
    }

    if doc.tax_total() > Decimal::ZERO && doc.accounts.tax.is_none() {
        return Err(ValidationError::TaxAccountRequired {
            kind: doc.kind,
            number: doc.number.clone(),
        });
    }

    match doc.kind {
        DocumentKind::Bill => {
            if doc.accounts.payable.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Payable));
            }
            if has_inventory_lines {
                if doc.accounts.inventory.is_none() {
                    return Err(ValidationError::missing(doc, AccountRole::Inventory));
                }
            } else if doc.accounts.expense.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Expense));
            }
        }
        DocumentKind::Invoice => {
            if doc.accounts.receivable.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Receivable));
            }
            if doc.accounts.revenue.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Revenue));
            }
            if has_inventory_lines {
                if doc.accounts.inventory.is_none() {
                    return Err(ValidationError::missing(doc, AccountRole::Inventory));
                }
                if doc.accounts.cogs.is_none() {
                    return Err(ValidationError::missing(doc, AccountRole::Cogs));
                }
            }
        }
        DocumentKind::Payment => {
            if doc.accounts.payable.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Payable));
            }
            if doc.accounts.bank.is_none() {
                return Err(ValidationError::missing(doc, AccountRole::Bank));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentAccounts, DocumentLine, DocumentStatus};
    use chrono::NaiveDate;
    use quill_shared::types::{AccountId, CompanyId, DocumentId};
    use rust_decimal_macros::dec;

    fn doc(kind: DocumentKind, accounts: DocumentAccounts, tax_rate: Decimal) -> Document {
        Document {
            id: DocumentId::new(),
            company_id: CompanyId::new(),
            kind,
            number: "DOC-0001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            lines: vec![DocumentLine {
                product_id: None,
                description: "thing".to_string(),
                quantity: dec!(1),
                unit_price: dec!(100),
                tax_rate,
            }],
            accounts,
            status: DocumentStatus::Draft,
            amount_paid: Decimal::ZERO,
            journal_entry_id: None,
        }
    }

    #[test]
    fn test_bill_requires_payable() {
        let d = doc(
            DocumentKind::Bill,
            DocumentAccounts {
                expense: Some(AccountId::new()),
                ..Default::default()
            },
            dec!(0),
        );
        let err = validate_for_posting(&d, false).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_ACCOUNT");
        assert!(err.to_string().contains("payable"));
    }

    #[test]
    fn test_bill_with_expense_and_payable_passes() {
        let d = doc(
            DocumentKind::Bill,
            DocumentAccounts {
                expense: Some(AccountId::new()),
                payable: Some(AccountId::new()),
                ..Default::default()
            },
            dec!(0),
        );
        assert!(validate_for_posting(&d, false).is_ok());
    }

    #[test]
    fn test_inventory_bill_needs_inventory_not_expense() {
        let d = doc(
            DocumentKind::Bill,
            DocumentAccounts {
                payable: Some(AccountId::new()),
                inventory: Some(AccountId::new()),
                ..Default::default()
            },
            dec!(0),
        );
        assert!(validate_for_posting(&d, true).is_ok());
        assert!(validate_for_posting(&d, false).is_err());
    }

    #[test]
    fn test_tax_account_required_only_when_taxed() {
        let accounts = DocumentAccounts {
            expense: Some(AccountId::new()),
            payable: Some(AccountId::new()),
            ..Default::default()
        };
        let untaxed = doc(DocumentKind::Bill, accounts.clone(), dec!(0));
        assert!(validate_for_posting(&untaxed, false).is_ok());

        let taxed = doc(DocumentKind::Bill, accounts, dec!(0.10));
        let err = validate_for_posting(&taxed, false).unwrap_err();
        assert_eq!(err.error_code(), "TAX_ACCOUNT_REQUIRED");
    }

    #[test]
    fn test_invoice_inventory_needs_cogs_pair() {
        let d = doc(
            DocumentKind::Invoice,
            DocumentAccounts {
                receivable: Some(AccountId::new()),
                revenue: Some(AccountId::new()),
                inventory: Some(AccountId::new()),
                ..Default::default()
            },
            dec!(0),
        );
        let err = validate_for_posting(&d, true).unwrap_err();
        assert!(err.to_string().contains("cogs"));
    }

    #[test]
    fn test_negative_line_amount_rejected() {
        let accounts = DocumentAccounts {
            expense: Some(AccountId::new()),
            payable: Some(AccountId::new()),
            ..Default::default()
        };
        let mut d = doc(DocumentKind::Bill, accounts, dec!(0));
        d.lines[0].unit_price = dec!(-5);
        let err = validate_for_posting(&d, false).unwrap_err();
        assert_eq!(err.error_code(), "NEGATIVE_LINE_AMOUNT");
        assert!(err.to_string().contains("DOC-0001"));

        d.lines[0].unit_price = dec!(5);
        d.lines[0].quantity = dec!(-1);
        assert!(validate_for_posting(&d, false).is_err());
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut d = doc(DocumentKind::Payment, DocumentAccounts::default(), dec!(0));
        d.lines.clear();
        let err = validate_for_posting(&d, false).unwrap_err();
        assert_eq!(err.error_code(), "NO_LINE_ITEMS");
    }
}

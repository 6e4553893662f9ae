//! Chart of accounts entries with type-based debit/credit polarity.
//!
//! `AccountType` is the single polarity authority in the system: every
//! posting, reversal, and projection consults `balance_delta` (or its exact
//! negation) rather than re-deriving the debit/credit arithmetic locally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quill_shared::types::{AccountId, CompanyId};

/// Account classification driving balance polarity.
///
/// In double-entry bookkeeping:
/// - Asset/Expense/COGS accounts are debit-normal (debit increases the balance)
/// - Liability/Equity/Revenue accounts are credit-normal (credit increases it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account (cash, receivables, inventory).
    Asset,
    /// Liability account (payables, loans).
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
    /// Cost of goods sold account.
    CostOfGoodsSold,
}

impl AccountType {
    /// Returns true if this account type increases on the debit side.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense | Self::CostOfGoodsSold)
    }

    /// Forward posting delta for a journal line against this account.
    ///
    /// Debit-normal: `debit - credit`. Credit-normal: `credit - debit`.
    /// The reversal delta is defined as the negation of this value and must
    /// never be re-derived independently.
    #[must_use]
    pub fn balance_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }

    /// Exact inverse of [`Self::balance_delta`], used by the reversal path.
    #[must_use]
    pub fn reversal_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        -self.balance_delta(debit, credit)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::CostOfGoodsSold => "cost_of_goods_sold",
        };
        f.write_str(name)
    }
}

/// A chart of accounts entry.
///
/// `balance` is a cache of the signed sum of all posted journal-line effects
/// on this account; it is mutated only by the posting and reversal engines
/// through the compare-and-swap `version` token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// The company this account belongs to.
    pub company_id: CompanyId,
    /// Account code (e.g. "1200").
    pub code: String,
    /// Human-readable account name.
    pub name: String,
    /// The account classification.
    pub account_type: AccountType,
    /// Cached running balance.
    pub balance: Decimal,
    /// Version token for compare-and-swap balance updates.
    pub version: i64,
}

impl Account {
    /// Creates a new account with a zero balance.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: AccountId::new(),
            company_id,
            code: code.into(),
            name: name.into(),
            account_type,
            balance: Decimal::ZERO,
            version: 0,
        }
    }
}

//! Balance projection from posted journal entries.
//!
//! The stored `Account.balance` field is strictly a cache; this module
//! provides both the authoritative full recomputation and the incremental
//! per-entry delta the engines apply after persisting an entry. The two
//! paths share the polarity arithmetic in [`AccountType::balance_delta`]
//! and must stay numerically identical.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quill_shared::types::{AccountId, JournalEntryId};

use super::account::{Account, AccountType};
use super::entry::JournalEntry;

/// Recomputes every account's balance from the full set of posted entries.
///
/// Every account starts at zero; entries not touching an account leave it
/// at zero rather than absent from the result.
#[must_use]
pub fn project_balances(
    accounts: &[Account],
    entries: &[JournalEntry],
) -> HashMap<AccountId, Decimal> {
    let types: HashMap<AccountId, AccountType> =
        accounts.iter().map(|a| (a.id, a.account_type)).collect();

    let mut balances: HashMap<AccountId, Decimal> =
        accounts.iter().map(|a| (a.id, Decimal::ZERO)).collect();

    for entry in entries {
        for line in &entry.lines {
            let Some(account_type) = types.get(&line.account_id) else {
                // Line against an account outside the provided chart; the
                // projection reports only known accounts.
                continue;
            };
            let delta = account_type.balance_delta(line.debit, line.credit);
            *balances.entry(line.account_id).or_insert(Decimal::ZERO) += delta;
        }
    }

    balances
}

/// The signed effect of a single entry on a single account.
///
/// Sums every line of the entry touching the account, so entries that debit
/// and credit the same account net correctly.
#[must_use]
pub fn entry_delta(account: &Account, entry: &JournalEntry) -> Decimal {
    entry
        .lines
        .iter()
        .filter(|line| line.account_id == account.id)
        .map(|line| account.account_type.balance_delta(line.debit, line.credit))
        .sum()
}

/// Applies an entry's effect to a cached account balance (incremental form).
pub fn apply_entry(account: &mut Account, entry: &JournalEntry) {
    account.balance += entry_delta(account, entry);
}

/// Applies the exact inverse of an entry's effect to a cached balance.
pub fn apply_reversal(account: &mut Account, entry: &JournalEntry) {
    account.balance -= entry_delta(account, entry);
}

/// One row of a running-balance ledger view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The journal entry this row came from.
    pub entry_id: JournalEntryId,
    /// The entry number (tie-break ordering key).
    pub entry_number: String,
    /// The accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Debit amount against the account.
    pub debit: Decimal,
    /// Credit amount against the account.
    pub credit: Decimal,
    /// Cumulative balance after this row.
    pub running_balance: Decimal,
}

/// Builds the running-balance ledger view for a single account.
///
/// Entries are sorted by `entry_date` ascending with ties broken by
/// `entry_number` (assigned sequentially at creation), which keeps the
/// cumulative sum deterministic.
#[must_use]
pub fn ledger_view(
    account: &Account,
    entries: &[JournalEntry],
    date_range: Option<(NaiveDate, NaiveDate)>,
) -> Vec<LedgerRow> {
    let mut touching: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| e.lines.iter().any(|l| l.account_id == account.id))
        .filter(|e| match date_range {
            Some((from, to)) => e.entry_date >= from && e.entry_date <= to,
            None => true,
        })
        .collect();
    touching.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.entry_number.cmp(&b.entry_number))
    });

    let mut running = Decimal::ZERO;
    let mut rows = Vec::with_capacity(touching.len());
    for entry in touching {
        let debit: Decimal = entry
            .lines
            .iter()
            .filter(|l| l.account_id == account.id)
            .map(|l| l.debit)
            .sum();
        let credit: Decimal = entry
            .lines
            .iter()
            .filter(|l| l.account_id == account.id)
            .map(|l| l.credit)
            .sum();
        running += account.account_type.balance_delta(debit, credit);
        rows.push(LedgerRow {
            entry_id: entry.id,
            entry_number: entry.entry_number.clone(),
            entry_date: entry.entry_date,
            description: entry.description.clone(),
            debit,
            credit,
            running_balance: running,
        });
    }
    rows
}

/// Balances aggregated by account type, for dashboard summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Total asset balance.
    pub assets: Decimal,
    /// Total liability balance.
    pub liabilities: Decimal,
    /// Total equity balance.
    pub equity: Decimal,
    /// Total revenue balance.
    pub revenue: Decimal,
    /// Total expense balance.
    pub expenses: Decimal,
    /// Total cost of goods sold balance.
    pub cost_of_goods_sold: Decimal,
}

impl TrialBalance {
    /// Gap in the accounting identity.
    ///
    /// Assets = Liabilities + Equity + (Revenue − Expenses − COGS); a
    /// consistent ledger projects a zero gap.
    #[must_use]
    pub fn identity_gap(&self) -> Decimal {
        self.assets
            - (self.liabilities + self.equity + self.revenue
                - self.expenses
                - self.cost_of_goods_sold)
    }
}

/// Aggregates projected balances by account type.
#[must_use]
pub fn trial_balance(accounts: &[Account], entries: &[JournalEntry]) -> TrialBalance {
    let balances = project_balances(accounts, entries);
    let mut summary = TrialBalance::default();
    for account in accounts {
        let balance = balances.get(&account.id).copied().unwrap_or_default();
        let bucket = match account.account_type {
            AccountType::Asset => &mut summary.assets,
            AccountType::Liability => &mut summary.liabilities,
            AccountType::Equity => &mut summary.equity,
            AccountType::Revenue => &mut summary.revenue,
            AccountType::Expense => &mut summary.expenses,
            AccountType::CostOfGoodsSold => &mut summary.cost_of_goods_sold,
        };
        *bucket += balance;
    }
    summary
}

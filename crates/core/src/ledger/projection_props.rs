//! Property tests for balance projection.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use quill_shared::types::{CompanyId, JournalEntryId};

use super::account::{Account, AccountType};
use super::entry::{EntryStatus, JournalEntry, JournalLine, SourceType};
use super::projection::{apply_entry, apply_reversal, entry_delta, project_balances};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Revenue),
        Just(AccountType::Expense),
        Just(AccountType::CostOfGoodsSold),
    ]
}

/// A small chart of accounts with stable indices for line generation.
fn chart() -> Vec<Account> {
    let company = CompanyId::new();
    vec![
        Account::new(company, "1000", "Cash", AccountType::Asset),
        Account::new(company, "1200", "Accounts Receivable", AccountType::Asset),
        Account::new(company, "2000", "Accounts Payable", AccountType::Liability),
        Account::new(company, "3000", "Owner Equity", AccountType::Equity),
        Account::new(company, "4000", "Sales", AccountType::Revenue),
        Account::new(company, "5000", "COGS", AccountType::CostOfGoodsSold),
        Account::new(company, "6000", "Rent", AccountType::Expense),
    ]
}

/// Generates a balanced two-line entry between two distinct chart accounts.
fn balanced_entry_strategy() -> impl Strategy<Value = (usize, usize, Decimal)> {
    (0usize..7, 0usize..7, amount_strategy())
        .prop_filter("distinct accounts", |(a, b, _)| a != b)
}

fn build_entry(seq: usize, accounts: &[Account], debit_ix: usize, credit_ix: usize, amount: Decimal) -> JournalEntry {
    let lines = vec![
        JournalLine::debit(&accounts[debit_ix], "prop", amount),
        JournalLine::credit(&accounts[credit_ix], "prop", amount),
    ];
    JournalEntry {
        id: JournalEntryId::new(),
        company_id: accounts[0].company_id,
        entry_number: format!("JE-{seq:06}"),
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        reference: String::new(),
        source_type: SourceType::Manual,
        source_id: None,
        description: "prop".to_string(),
        status: EntryStatus::Posted,
        lines,
        total_debits: amount,
        total_credits: amount,
        posted_by: None,
        posted_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Polarity round-trip**: applying and then reversing an entry leaves
    /// every account balance exactly where it started. The inverse uses the
    /// negated forward formula, so equality is exact, not within tolerance.
    #[test]
    fn prop_post_then_reverse_is_identity(
        specs in prop::collection::vec(balanced_entry_strategy(), 1..8),
        starting in amount_strategy(),
    ) {
        let mut accounts = chart();
        for account in &mut accounts {
            account.balance = starting;
        }
        let entries: Vec<JournalEntry> = specs
            .iter()
            .enumerate()
            .map(|(i, &(d, c, amt))| build_entry(i + 1, &accounts, d, c, amt))
            .collect();

        for entry in &entries {
            for account in &mut accounts {
                apply_entry(account, entry);
            }
        }
        for entry in &entries {
            for account in &mut accounts {
                apply_reversal(account, entry);
            }
        }

        for account in &accounts {
            prop_assert_eq!(account.balance, starting);
        }
    }

    /// **Projection equivalence**: summing incremental deltas account by
    /// account equals the full recomputation, regardless of the order the
    /// entries are applied in (delta application commutes per account).
    #[test]
    fn prop_incremental_equals_full_projection(
        specs in prop::collection::vec(balanced_entry_strategy(), 1..10),
        seed in any::<u64>(),
    ) {
        let accounts = chart();
        let entries: Vec<JournalEntry> = specs
            .iter()
            .enumerate()
            .map(|(i, &(d, c, amt))| build_entry(i + 1, &accounts, d, c, amt))
            .collect();

        let full = project_balances(&accounts, &entries);

        // Apply incrementally in a seed-derived permutation.
        let mut permuted: Vec<&JournalEntry> = entries.iter().collect();
        let len = permuted.len();
        let mut state = seed;
        for i in (1..len).rev() {
            // xorshift; only used to shuffle deterministically per seed
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            #[allow(clippy::cast_possible_truncation)]
            let j = (state % (i as u64 + 1)) as usize;
            permuted.swap(i, j);
        }

        let mut incremental = accounts.clone();
        for entry in permuted {
            for account in &mut incremental {
                apply_entry(account, entry);
            }
        }

        for account in &incremental {
            prop_assert_eq!(account.balance, full[&account.id]);
        }
    }

    /// **Balanced entries preserve the accounting identity**: the sum of
    /// signed deltas over debit-normal accounts equals the sum over
    /// credit-normal accounts for every balanced entry.
    #[test]
    fn prop_balanced_entry_preserves_identity(
        (d, c, amt) in balanced_entry_strategy(),
    ) {
        let accounts = chart();
        let entry = build_entry(1, &accounts, d, c, amt);

        let debit_normal: Decimal = accounts
            .iter()
            .filter(|a| a.account_type.is_debit_normal())
            .map(|a| entry_delta(a, &entry))
            .sum();
        let credit_normal: Decimal = accounts
            .iter()
            .filter(|a| !a.account_type.is_debit_normal())
            .map(|a| entry_delta(a, &entry))
            .sum();

        prop_assert_eq!(debit_normal, credit_normal);
    }

    /// **Forward and reversal deltas cancel exactly** for any account type
    /// and any debit/credit pair.
    #[test]
    fn prop_deltas_cancel(
        account_type in account_type_strategy(),
        debit in amount_strategy(),
        credit in amount_strategy(),
    ) {
        let forward = account_type.balance_delta(debit, credit);
        let reverse = account_type.reversal_delta(debit, credit);
        prop_assert_eq!(forward + reverse, Decimal::ZERO);
    }
}

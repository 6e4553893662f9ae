//! Incremental balance application.
//!
//! Balances never get recomputed here: posting applies each account's
//! signed delta, and reversal applies the exact negation of that same
//! delta. The two are inverses by construction, so post-then-reverse
//! is always a balance no-op.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use quill_core::ledger::JournalEntry;
use quill_shared::types::AccountId;
use quill_store::{AccountStore, StoreError};

use crate::error::EngineError;

/// Whether deltas are applied as posted or as their negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Posting: apply `balance_delta`.
    Forward,
    /// Reversal: apply `reversal_delta`.
    Reverse,
}

/// Applies one entry's balance deltas to its accounts.
///
/// Lines are aggregated per account first so each account sees a single
/// compare-and-set, retried up to `max_retries` times on lost races. On
/// reversal, accounts deleted since posting are logged and skipped; their
/// balance no longer exists to correct.
pub async fn apply_entry<S: AccountStore>(
    store: &S,
    entry: &JournalEntry,
    direction: Direction,
    max_retries: u32,
) -> Result<(), EngineError> {
    let mut per_account: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
    for line in &entry.lines {
        let slot = per_account.entry(line.account_id).or_default();
        slot.0 += line.debit;
        slot.1 += line.credit;
    }

    for (account_id, (debit, credit)) in per_account {
        apply_to_account(store, account_id, debit, credit, direction, max_retries).await?;
    }
    Ok(())
}

async fn apply_to_account<S: AccountStore>(
    store: &S,
    account_id: AccountId,
    debit: Decimal,
    credit: Decimal,
    direction: Direction,
    max_retries: u32,
) -> Result<(), EngineError> {
    let mut attempts = 0u32;
    loop {
        let account = match store.get_account(account_id).await {
            Ok(account) => account,
            Err(StoreError::NotFound { .. }) if direction == Direction::Reverse => {
                warn!(%account_id, "account deleted since posting, skipping reversal delta");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let delta = match direction {
            Direction::Forward => account.account_type.balance_delta(debit, credit),
            Direction::Reverse => account.account_type.reversal_delta(debit, credit),
        };

        match store
            .update_balance(account_id, account.balance + delta, account.version)
            .await
        {
            Ok(updated) => {
                debug!(
                    %account_id,
                    %delta,
                    balance = %updated.balance,
                    "applied balance delta"
                );
                return Ok(());
            }
            Err(StoreError::VersionMismatch { .. }) => {
                attempts += 1;
                if attempts >= max_retries {
                    return Err(EngineError::BalanceConflict {
                        account: account_id,
                        attempts,
                    });
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

//! Posting and reversal engine for Quill.
//!
//! Orchestrates document posting, journal reversal, balance maintenance,
//! and inventory side effects over any [`quill_store::EntityStore`]
//! backend. [`Books`] is the entry point.

pub mod balances;
pub mod error;
pub mod inventory;
pub mod posting;
pub mod reversal;
pub mod saga;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use quill_core::document::Document;
use quill_core::ledger::{
    JournalEntry, LedgerRow, TrialBalance, ledger_view, project_balances, trial_balance,
};
use quill_shared::AppConfig;
use quill_shared::types::{AccountId, CompanyId, DocumentId, UserId};
use quill_store::{AccountStore, EntityStore, JournalStore};

pub use error::EngineError;
pub use posting::PostOutcome;

/// A stored balance that disagrees with full projection from the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDrift {
    /// The drifting account.
    pub account_id: AccountId,
    /// The balance the store holds.
    pub stored: Decimal,
    /// The balance recomputed from every journal entry.
    pub projected: Decimal,
}

/// The accounting engine over one store backend.
pub struct Books<S> {
    store: S,
    max_retries: u32,
}

impl<S: EntityStore> Books<S> {
    /// Wraps a store with the default retry budget.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_retries: 5,
        }
    }

    /// Wraps a store, taking the retry budget from configuration.
    #[must_use]
    pub fn with_config(store: S, config: &AppConfig) -> Self {
        Self {
            store,
            max_retries: config.posting.balance_update_retries,
        }
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves a document, posting or reversing per its status transition.
    pub async fn post_document(
        &self,
        doc: Document,
        posted_by: UserId,
    ) -> Result<PostOutcome, EngineError> {
        posting::post_document(&self.store, doc, posted_by, self.max_retries).await
    }

    /// Deletes a document after reversing everything it posted. Returns
    /// the number of journal entries reversed.
    pub async fn reverse_and_delete_document(
        &self,
        document_id: DocumentId,
    ) -> Result<usize, EngineError> {
        reversal::reverse_and_delete_document(&self.store, document_id, self.max_retries).await
    }

    /// Current stored balance of one account.
    pub async fn account_balance(&self, id: AccountId) -> Result<Decimal, EngineError> {
        Ok(self.store.get_account(id).await?.balance)
    }

    /// Chronological ledger rows for one account, optionally date-bounded.
    pub async fn ledger(
        &self,
        account_id: AccountId,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<LedgerRow>, EngineError> {
        let account = self.store.get_account(account_id).await?;
        let entries = self.store.list_entries(account.company_id).await?;
        Ok(ledger_view(&account, &entries, range))
    }

    /// Trial balance across a company's chart, projected from the journal.
    pub async fn trial_balance(&self, company_id: CompanyId) -> Result<TrialBalance, EngineError> {
        let accounts = self.store.list_accounts(company_id).await?;
        let entries = self.store.list_entries(company_id).await?;
        Ok(trial_balance(&accounts, &entries))
    }

    /// Compares every stored balance against full projection.
    pub async fn audit_balances(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<BalanceDrift>, EngineError> {
        let accounts = self.store.list_accounts(company_id).await?;
        let entries = self.store.list_entries(company_id).await?;
        let projected = project_balances(&accounts, &entries);

        let mut drift = Vec::new();
        for account in &accounts {
            let expected = projected.get(&account.id).copied().unwrap_or_default();
            if expected != account.balance {
                drift.push(BalanceDrift {
                    account_id: account.id,
                    stored: account.balance,
                    projected: expected,
                });
            }
        }
        Ok(drift)
    }

    /// Journal entries whose source document was deleted out-of-band.
    pub async fn find_orphaned_entries(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<JournalEntry>, EngineError> {
        reversal::find_orphaned_entries(&self.store, company_id).await
    }
}

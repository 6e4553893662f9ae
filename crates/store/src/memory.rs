//! In-memory store backend.
//!
//! The reference backend used by tests and local tooling. All aggregates
//! live behind one `RwLock` so cross-aggregate reads see a consistent
//! snapshot; writers serialize, which is fine at this scale.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use async_trait::async_trait;

use quill_shared::types::{
    AccountId, CompanyId, DocumentId, InventoryTransactionId, JournalEntryId, ProductId,
};

use quill_core::document::Document;
use quill_core::inventory::{InventoryTransaction, Product};
use quill_core::ledger::{
    Account, EntryStatus, JournalEntry, LedgerError, NewJournalEntry, SourceType,
};

use crate::error::StoreError;
use crate::traits::{AccountStore, DocumentStore, InventoryStore, JournalStore, ProductStore};

#[derive(Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    entries: HashMap<JournalEntryId, JournalEntry>,
    documents: HashMap<DocumentId, Document>,
    products: HashMap<ProductId, Product>,
    inventory: HashMap<InventoryTransactionId, InventoryTransaction>,
    entry_counters: HashMap<CompanyId, u64>,
}

/// A thread-safe in-memory `EntityStore` implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account, bypassing duplicate checks. Test helper.
    pub async fn seed_account(&self, account: Account) {
        self.inner.write().await.accounts.insert(account.id, account);
    }

    /// Seeds a product. Test helper.
    pub async fn seed_product(&self, product: Product) {
        self.inner.write().await.products.insert(product.id, product);
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("account", id))
    }

    async fn list_accounts(&self, company_id: CompanyId) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!(
                "account {} already exists",
                account.id
            )));
        }
        if inner
            .accounts
            .values()
            .any(|a| a.company_id == account.company_id && a.code == account.code)
        {
            return Err(StoreError::Conflict(format!(
                "account code {} already in use",
                account.code
            )));
        }
        inner.accounts.insert(account.id, account);
        Ok(())
    }

    async fn update_balance(
        &self,
        id: AccountId,
        balance: Decimal,
        expected_version: i64,
    ) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("account", id))?;
        if account.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                actual: account.version,
            });
        }
        account.balance = balance;
        account.version += 1;
        Ok(account.clone())
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, StoreError> {
        if !entry.is_balanced() {
            return Err(StoreError::from(LedgerError::UnbalancedEntry {
                reference: entry.reference.clone(),
                debit: entry.total_debits(),
                credit: entry.total_credits(),
            }));
        }

        let mut inner = self.inner.write().await;
        let counter = inner.entry_counters.entry(entry.company_id).or_insert(0);
        *counter += 1;
        let entry_number = format!("JE-{:06}", *counter);

        let stored = JournalEntry {
            id: JournalEntryId::new(),
            company_id: entry.company_id,
            entry_number,
            entry_date: entry.entry_date,
            reference: entry.reference,
            source_type: entry.source_type,
            source_id: entry.source_id,
            description: entry.description,
            status: EntryStatus::Posted,
            total_debits: entry.lines.iter().map(|l| l.debit).sum(),
            total_credits: entry.lines.iter().map(|l| l.credit).sum(),
            lines: entry.lines,
            posted_by: entry.posted_by,
            posted_at: Utc::now(),
        };
        let result = stored.clone();
        inner.entries.insert(stored.id, stored);
        Ok(result)
    }

    async fn get_entry(&self, id: JournalEntryId) -> Result<JournalEntry, StoreError> {
        self.inner
            .read()
            .await
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("journal entry", id))
    }

    async fn delete_entry(&self, id: JournalEntryId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("journal entry", id))
    }

    async fn list_entries(&self, company_id: CompanyId) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn find_by_company_and_status(
        &self,
        company_id: CompanyId,
        status: EntryStatus,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.company_id == company_id && e.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_source(
        &self,
        company_id: CompanyId,
        source_type: SourceType,
        source_id: DocumentId,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .entries
            .values()
            .filter(|e| {
                e.company_id == company_id
                    && e.source_type == source_type
                    && e.source_id == Some(source_id)
            })
            .cloned()
            .collect())
    }

    async fn find_by_reference(
        &self,
        company_id: CompanyId,
        reference: &str,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.company_id == company_id && e.reference.contains(reference))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, id: DocumentId) -> Result<Document, StoreError> {
        self.inner
            .read()
            .await
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("document", id))
    }

    async fn find_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn save_document(&self, document: Document) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .documents
            .insert(document.id, document);
        Ok(())
    }

    async fn delete_document(&self, id: DocumentId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .documents
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("document", id))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.inner
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(id))
            .cloned()
            .collect())
    }

    async fn save_product(&self, product: Product) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .products
            .insert(product.id, product);
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("product", id))
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn record_transaction(&self, txn: InventoryTransaction) -> Result<(), StoreError> {
        self.inner.write().await.inventory.insert(txn.id, txn);
        Ok(())
    }

    async fn find_transactions_by_reference(
        &self,
        company_id: CompanyId,
        reference_id: DocumentId,
    ) -> Result<Vec<InventoryTransaction>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .inventory
            .values()
            .filter(|t| t.company_id == company_id && t.reference_id == reference_id)
            .cloned()
            .collect())
    }

    async fn delete_transaction(&self, id: InventoryTransactionId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .inventory
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("inventory transaction", id))
    }
}

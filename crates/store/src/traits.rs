//! Capability traits for the entity store.
//!
//! Each aggregate gets its own narrow trait; `EntityStore` bundles them
//! for callers that orchestrate across aggregates. Backends decide how
//! they persist; the engine only ever talks through these traits.

use async_trait::async_trait;

use quill_shared::types::{
    AccountId, CompanyId, DocumentId, InventoryTransactionId, JournalEntryId, ProductId,
};
use rust_decimal::Decimal;

use quill_core::document::Document;
use quill_core::inventory::{InventoryTransaction, Product};
use quill_core::ledger::{Account, EntryStatus, JournalEntry, NewJournalEntry, SourceType};

use crate::error::StoreError;

/// Chart of accounts persistence.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetches one account.
    async fn get_account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Lists a company's chart of accounts.
    async fn list_accounts(&self, company_id: CompanyId) -> Result<Vec<Account>, StoreError>;

    /// Inserts a new account. Fails on duplicate ID or code.
    async fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Writes a new balance if `expected_version` still matches.
    ///
    /// On success the stored version is bumped and the updated account
    /// returned; on a lost race the error is `VersionMismatch` and the
    /// caller re-reads before retrying.
    async fn update_balance(
        &self,
        id: AccountId,
        balance: Decimal,
        expected_version: i64,
    ) -> Result<Account, StoreError>;
}

/// Journal entry persistence. Entries are immutable once created.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Persists a new entry, assigning its ID and sequential number.
    ///
    /// Unbalanced entries are rejected with a ledger violation; nothing
    /// is written in that case.
    async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, StoreError>;

    /// Fetches one entry.
    async fn get_entry(&self, id: JournalEntryId) -> Result<JournalEntry, StoreError>;

    /// Removes an entry. Not idempotent: deleting a missing entry is an
    /// error; callers that tolerate already-deleted match on `NotFound`.
    async fn delete_entry(&self, id: JournalEntryId) -> Result<(), StoreError>;

    /// All entries for a company, unordered.
    async fn list_entries(&self, company_id: CompanyId) -> Result<Vec<JournalEntry>, StoreError>;

    /// A company's entries filtered by status.
    async fn find_by_company_and_status(
        &self,
        company_id: CompanyId,
        status: EntryStatus,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Entries created from a given source document.
    async fn find_by_source(
        &self,
        company_id: CompanyId,
        source_type: SourceType,
        source_id: DocumentId,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Entries whose reference contains the given fragment.
    ///
    /// Containment rather than equality: legacy entries without source
    /// linkage often embed the document number inside a longer reference
    /// string, and this lookup is what still finds them.
    async fn find_by_reference(
        &self,
        company_id: CompanyId,
        reference: &str,
    ) -> Result<Vec<JournalEntry>, StoreError>;
}

/// Source document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document.
    async fn get_document(&self, id: DocumentId) -> Result<Document, StoreError>;

    /// Fetches one document if it exists.
    async fn find_document(&self, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Inserts or replaces a document.
    async fn save_document(&self, document: Document) -> Result<(), StoreError>;

    /// Removes a document.
    async fn delete_document(&self, id: DocumentId) -> Result<(), StoreError>;
}

/// Product catalog persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches one product.
    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Fetches the products referenced by a document's lines; unknown IDs
    /// are skipped rather than erroring.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Inserts or replaces a product.
    async fn save_product(&self, product: Product) -> Result<(), StoreError>;

    /// Removes a product from the catalog.
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;
}

/// Inventory movement persistence.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Records one stock movement.
    async fn record_transaction(
        &self,
        txn: InventoryTransaction,
    ) -> Result<(), StoreError>;

    /// Movements caused by a given document.
    async fn find_transactions_by_reference(
        &self,
        company_id: CompanyId,
        reference_id: DocumentId,
    ) -> Result<Vec<InventoryTransaction>, StoreError>;

    /// Removes one movement record.
    async fn delete_transaction(&self, id: InventoryTransactionId) -> Result<(), StoreError>;
}

/// The full store surface the posting and reversal engines need.
pub trait EntityStore:
    AccountStore + JournalStore + DocumentStore + ProductStore + InventoryStore
{
}

impl<T> EntityStore for T where
    T: AccountStore + JournalStore + DocumentStore + ProductStore + InventoryStore
{
}

//! Journal reversal and document deletion.
//!
//! Reversal is the algebraic inverse of posting: for every entry a
//! document produced, each account receives the negation of the delta
//! posting applied, then the entry itself is removed. Amounts are never
//! re-derived from the document, so a reversal cancels exactly what was
//! posted even if the document changed since.

use std::collections::HashMap;

use tracing::{info, warn};

use quill_core::document::Document;
use quill_core::ledger::JournalEntry;
use quill_shared::types::{CompanyId, DocumentId, JournalEntryId};
use quill_store::{DocumentStore, EntityStore, JournalStore, StoreError};

use crate::balances::{self, Direction};
use crate::error::EngineError;
use crate::inventory;
use crate::saga::Saga;

/// Finds every journal entry a document produced.
///
/// Three lookups are unioned: the document's stored back-reference, the
/// source linkage, and a containment match on the reference string.
/// Records written before source linkage existed often bury the document
/// number inside a longer reference, which is why all three run every
/// time. Containment also picks up the cost-of-goods companion entry.
pub async fn locate_entries<S: EntityStore>(
    store: &S,
    doc: &Document,
) -> Result<Vec<JournalEntry>, EngineError> {
    let mut found: HashMap<JournalEntryId, JournalEntry> = HashMap::new();

    if let Some(id) = doc.journal_entry_id {
        match store.get_entry(id).await {
            Ok(entry) => {
                found.insert(entry.id, entry);
            }
            Err(StoreError::NotFound { .. }) => {
                warn!(entry_id = %id, document = %doc.id, "back-referenced entry already gone");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let by_source = store
        .find_by_source(doc.company_id, doc.kind.source_type(), doc.id)
        .await?;
    for entry in by_source {
        found.insert(entry.id, entry);
    }

    let by_reference = store.find_by_reference(doc.company_id, &doc.number).await?;
    for entry in by_reference {
        found.insert(entry.id, entry);
    }

    let mut entries: Vec<JournalEntry> = found.into_values().collect();
    entries.sort_by(|a, b| a.entry_number.cmp(&b.entry_number));
    Ok(entries)
}

/// Reverses one entry's balance effects and deletes it.
pub async fn reverse_entry<S: EntityStore>(
    store: &S,
    entry: &JournalEntry,
    max_retries: u32,
) -> Result<(), EngineError> {
    balances::apply_entry(store, entry, Direction::Reverse, max_retries).await?;
    match store.delete_entry(entry.id).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound { .. }) => {
            warn!(entry_id = %entry.id, "entry deleted concurrently during reversal");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn reversal_steps(entry_count: usize) -> Vec<&'static str> {
    let mut steps: Vec<&'static str> = std::iter::repeat_n("reverse entry", entry_count).collect();
    steps.push("restore inventory");
    steps
}

async fn run_reversal<S: EntityStore>(
    store: &S,
    doc: &Document,
    entries: &[JournalEntry],
    saga: &mut Saga,
    max_retries: u32,
) -> Result<(), EngineError> {
    for entry in entries {
        saga.run("reverse entry", reverse_entry(store, entry, max_retries))
            .await?;
    }
    saga.run(
        "restore inventory",
        inventory::restore_moves(store, doc.company_id, doc.id),
    )
    .await?;
    Ok(())
}

/// Reverses everything a document posted: journal entries, account
/// balances, and inventory movements. The document itself is untouched.
///
/// Runs as a saga so a failure partway still names the steps already
/// written.
pub async fn reverse_document_effects<S: EntityStore>(
    store: &S,
    doc: &Document,
    max_retries: u32,
) -> Result<(), EngineError> {
    let entries = locate_entries(store, doc).await?;
    info!(document = %doc.number, count = entries.len(), "reversing journal entries");
    let mut saga = Saga::new(doc.number.clone(), reversal_steps(entries.len()));
    run_reversal(store, doc, &entries, &mut saga, max_retries).await
}

/// Reverses a document's effects and removes the document.
///
/// Returns the reversed entry count. Running it twice is safe: the
/// second call finds nothing to reverse and fails only on the missing
/// document, which callers treat as already-deleted.
pub async fn reverse_and_delete_document<S: EntityStore>(
    store: &S,
    document_id: DocumentId,
    max_retries: u32,
) -> Result<usize, EngineError> {
    let doc = store.get_document(document_id).await?;
    let entries = locate_entries(store, &doc).await?;
    let count = entries.len();

    let mut planned = reversal_steps(count);
    planned.push("delete document");
    let mut saga = Saga::new(doc.number.clone(), planned);
    run_reversal(store, &doc, &entries, &mut saga, max_retries).await?;
    saga.run("delete document", store.delete_document(document_id))
        .await?;
    Ok(count)
}

/// Journal entries whose source document no longer exists.
///
/// These come from deletions that bypassed the engine; the scan makes
/// them visible so they can be reversed explicitly.
pub async fn find_orphaned_entries<S: EntityStore>(
    store: &S,
    company_id: CompanyId,
) -> Result<Vec<JournalEntry>, EngineError> {
    let mut orphans = Vec::new();
    for entry in store.list_entries(company_id).await? {
        let Some(source_id) = entry.source_id else {
            continue;
        };
        if store.find_document(source_id).await?.is_none() {
            orphans.push(entry);
        }
    }
    orphans.sort_by(|a, b| a.entry_number.cmp(&b.entry_number));
    Ok(orphans)
}

//! Document posting orchestration.
//!
//! Saving a document runs the posting state machine: the incoming status
//! and the presence of prior entries decide whether to post, repost,
//! reverse, or do nothing. Validation and plan construction happen before
//! the first write, so a rejected document leaves no partial state.

use std::collections::HashMap;

use tracing::{debug, info};

use quill_core::document::{Document, PostingAction};
use quill_core::ledger::Account;
use quill_core::posting::{PostingPlan, build_plan};
use quill_shared::types::{AccountId, JournalEntryId, UserId};
use quill_store::{
    AccountStore, DocumentStore, EntityStore, JournalStore, ProductStore, StoreError,
};

use crate::balances::{self, Direction};
use crate::error::EngineError;
use crate::inventory;
use crate::reversal;
use crate::saga::Saga;

/// What saving a document produced.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    /// The stored document, back-reference included when posting occurred.
    pub document: Document,
    /// The journal entries this save created, in creation order.
    pub journal_entry_ids: Vec<JournalEntryId>,
}

/// Saves a document and applies whatever ledger effects its status
/// transition implies.
pub async fn post_document<S: EntityStore>(
    store: &S,
    mut doc: Document,
    posted_by: UserId,
    max_retries: u32,
) -> Result<PostOutcome, EngineError> {
    let existing = reversal::locate_entries(store, &doc).await?;
    let action = PostingAction::for_transition(!existing.is_empty(), doc.is_postable());
    debug!(document = %doc.id, ?action, status = %doc.status, "posting state transition");

    match action {
        PostingAction::NoChange => {
            store.save_document(doc.clone()).await?;
            Ok(PostOutcome {
                document: doc,
                journal_entry_ids: Vec::new(),
            })
        }
        PostingAction::Reverse => {
            reversal::reverse_document_effects(store, &doc, max_retries).await?;
            doc.journal_entry_id = None;
            store.save_document(doc.clone()).await?;
            Ok(PostOutcome {
                document: doc,
                journal_entry_ids: Vec::new(),
            })
        }
        PostingAction::Post => execute_plan(store, doc, posted_by, max_retries).await,
        PostingAction::Repost => {
            // reverse the old effects first so the new posting starts clean
            reversal::reverse_document_effects(store, &doc, max_retries).await?;
            doc.journal_entry_id = None;
            execute_plan(store, doc, posted_by, max_retries).await
        }
    }
}

async fn load_plan<S: EntityStore>(
    store: &S,
    doc: &Document,
    posted_by: UserId,
) -> Result<PostingPlan, EngineError> {
    let product_ids: Vec<_> = doc.lines.iter().filter_map(|l| l.product_id).collect();
    let products = store
        .get_products(&product_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut accounts: HashMap<AccountId, Account> = HashMap::new();
    for id in doc.accounts.referenced_ids() {
        match store.get_account(id).await {
            Ok(account) => {
                accounts.insert(id, account);
            }
            // left absent so the plan reports it as an unknown account
            Err(StoreError::NotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(build_plan(doc, &products, &accounts, posted_by)?)
}

async fn execute_plan<S: EntityStore>(
    store: &S,
    mut doc: Document,
    posted_by: UserId,
    max_retries: u32,
) -> Result<PostOutcome, EngineError> {
    let plan = load_plan(store, &doc, posted_by).await?;

    let mut planned = vec!["save document"];
    planned.extend(std::iter::repeat_n("create journal entry", plan.entries.len()));
    if !plan.entries.is_empty() {
        planned.push("link journal entry");
    }
    planned.extend(std::iter::repeat_n("apply balances", plan.entries.len()));
    planned.push("record inventory");
    let mut saga = Saga::new(doc.number.clone(), planned);

    saga.run("save document", store.save_document(doc.clone()))
        .await?;

    let mut created = Vec::with_capacity(plan.entries.len());
    for entry in plan.entries {
        let stored = saga.run("create journal entry", store.create_entry(entry)).await?;
        created.push(stored);
    }

    if let Some(first) = created.first() {
        doc.journal_entry_id = Some(first.id);
        saga.run("link journal entry", store.save_document(doc.clone()))
            .await?;
    }

    for entry in &created {
        saga.run(
            "apply balances",
            balances::apply_entry(store, entry, Direction::Forward, max_retries),
        )
        .await?;
    }

    saga.run(
        "record inventory",
        inventory::apply_moves(store, &doc, &plan.inventory_moves),
    )
    .await?;

    info!(
        document = %doc.id,
        entries = created.len(),
        "document posted"
    );
    Ok(PostOutcome {
        document: doc,
        journal_entry_ids: created.into_iter().map(|e| e.id).collect(),
    })
}

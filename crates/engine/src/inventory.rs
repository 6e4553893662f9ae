//! Inventory side effects of posting and reversal.

use rust_decimal::Decimal;
use tracing::warn;

use quill_core::document::Document;
use quill_core::inventory::{InventoryTransaction, InventoryTxnType};
use quill_core::posting::InventoryMove;
use quill_shared::types::{CompanyId, DocumentId, InventoryTransactionId};
use quill_store::{InventoryStore, ProductStore, StoreError};

/// Records a plan's stock movements and adjusts product quantities.
///
/// Products removed from the catalog since the plan was built are logged
/// and skipped; the journal side of the posting stands on its own.
pub async fn apply_moves<S: InventoryStore + ProductStore>(
    store: &S,
    doc: &Document,
    moves: &[InventoryMove],
) -> Result<(), StoreError> {
    for mv in moves {
        let mut product = match store.get_product(mv.product_id).await {
            Ok(product) => product,
            Err(StoreError::NotFound { .. }) => {
                warn!(product_id = %mv.product_id, document = %doc.id, "product gone, skipping stock movement");
                continue;
            }
            Err(err) => return Err(err),
        };

        let (quantity_in, quantity_out, delta) = match mv.transaction_type {
            InventoryTxnType::Purchase => (mv.quantity, Decimal::ZERO, mv.quantity),
            InventoryTxnType::Sale => (Decimal::ZERO, mv.quantity, -mv.quantity),
        };

        store
            .record_transaction(InventoryTransaction {
                id: InventoryTransactionId::new(),
                company_id: doc.company_id,
                product_id: mv.product_id,
                quantity_in,
                quantity_out,
                unit_cost: mv.unit_cost,
                total_value: (mv.unit_cost * mv.quantity).round_dp(2),
                reference_type: doc.kind.source_type(),
                reference_id: doc.id,
                transaction_type: mv.transaction_type,
                date: doc.date,
            })
            .await?;

        product.quantity_on_hand += delta;
        store.save_product(product).await?;
    }
    Ok(())
}

/// Undoes the stock movements a document caused and deletes their records.
///
/// Each record reverses from its own stored quantities, so restoration is
/// exact regardless of later catalog changes. Movements whose product no
/// longer exists still get their records deleted.
pub async fn restore_moves<S: InventoryStore + ProductStore>(
    store: &S,
    company_id: CompanyId,
    document_id: DocumentId,
) -> Result<(), StoreError> {
    let txns = store
        .find_transactions_by_reference(company_id, document_id)
        .await?;
    for txn in txns {
        match store.get_product(txn.product_id).await {
            Ok(mut product) => {
                product.quantity_on_hand -= txn.quantity_delta();
                store.save_product(product).await?;
            }
            Err(StoreError::NotFound { .. }) => {
                warn!(product_id = %txn.product_id, %document_id, "product gone, dropping stock record only");
            }
            Err(err) => return Err(err),
        }
        store.delete_transaction(txn.id).await?;
    }
    Ok(())
}

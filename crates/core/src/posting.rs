//! Builds the journal entries and stock movements a document implies.
//!
//! `build_plan` is pure: it maps a validated document onto a `PostingPlan`
//! without touching any store. The engine executes the plan; anything that
//! fails here fails before persistence.

use std::collections::HashMap;

use rust_decimal::Decimal;

use quill_shared::types::{AccountId, ProductId, UserId};

use crate::document::{AccountRole, Document, DocumentKind, ValidationError, validate_for_posting};
use crate::inventory::{InventoryTxnType, Product};
use crate::ledger::{Account, JournalLine, NewJournalEntry};

/// One pending stock movement, direction given by the transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryMove {
    /// The product moved.
    pub product_id: ProductId,
    /// Units moved; always positive.
    pub quantity: Decimal,
    /// Cost basis per unit.
    pub unit_cost: Decimal,
    /// Purchase (stock in) or sale (stock out).
    pub transaction_type: InventoryTxnType,
}

/// Everything posting a document will persist, computed up front.
#[derive(Debug, Clone, Default)]
pub struct PostingPlan {
    /// Journal entries to create, in order.
    pub entries: Vec<NewJournalEntry>,
    /// Stock movements to record.
    pub inventory_moves: Vec<InventoryMove>,
}

impl PostingPlan {
    /// Whether the plan does anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.inventory_moves.is_empty()
    }
}

fn resolve<'a>(
    accounts: &'a HashMap<AccountId, Account>,
    id: Option<AccountId>,
    doc: &Document,
    role: AccountRole,
) -> Result<&'a Account, ValidationError> {
    let id = id.ok_or_else(|| ValidationError::missing(doc, role))?;
    accounts
        .get(&id)
        .ok_or_else(|| ValidationError::unknown(doc, role, id))
}

fn stocked_product<'a>(
    products: &'a HashMap<ProductId, Product>,
    line_product: Option<ProductId>,
) -> Option<&'a Product> {
    let id = line_product?;
    products.get(&id).filter(|p| p.is_stocked())
}

/// Maps a document onto the journal entries and stock movements it implies.
///
/// `products` and `accounts` are the catalog rows and chart rows the
/// document references, resolved by the caller. The returned entries are
/// balanced by construction.
pub fn build_plan(
    doc: &Document,
    products: &HashMap<ProductId, Product>,
    accounts: &HashMap<AccountId, Account>,
    posted_by: UserId,
) -> Result<PostingPlan, ValidationError> {
    let has_inventory = doc
        .lines
        .iter()
        .any(|l| stocked_product(products, l.product_id).is_some());
    validate_for_posting(doc, has_inventory)?;

    match doc.kind {
        DocumentKind::Bill => plan_bill(doc, products, accounts, posted_by),
        DocumentKind::Invoice => plan_invoice(doc, products, accounts, posted_by),
        DocumentKind::Payment => plan_payment(doc, accounts, posted_by),
    }
}

fn new_entry(doc: &Document, reference: String, description: String, posted_by: UserId, lines: Vec<JournalLine>) -> NewJournalEntry {
    NewJournalEntry {
        company_id: doc.company_id,
        entry_date: doc.date,
        reference,
        source_type: doc.kind.source_type(),
        source_id: Some(doc.id),
        description,
        lines,
        posted_by: Some(posted_by),
    }
}

/// DR expense (or inventory asset for stocked lines), DR tax, CR payable.
fn plan_bill(
    doc: &Document,
    products: &HashMap<ProductId, Product>,
    accounts: &HashMap<AccountId, Account>,
    posted_by: UserId,
) -> Result<PostingPlan, ValidationError> {
    let payable = resolve(accounts, doc.accounts.payable, doc, AccountRole::Payable)?;

    let mut lines = Vec::new();
    let mut moves = Vec::new();

    for item in &doc.lines {
        let amount = item.subtotal();
        if let Some(product) = stocked_product(products, item.product_id) {
            let inventory =
                resolve(accounts, doc.accounts.inventory, doc, AccountRole::Inventory)?;
            lines.push(JournalLine::debit(inventory, &item.description, amount));
            if item.quantity != Decimal::ZERO {
                moves.push(InventoryMove {
                    product_id: product.id,
                    quantity: item.quantity,
                    unit_cost: item.unit_price,
                    transaction_type: InventoryTxnType::Purchase,
                });
            }
        } else {
            let expense = resolve(accounts, doc.accounts.expense, doc, AccountRole::Expense)?;
            lines.push(JournalLine::debit(expense, &item.description, amount));
        }
    }

    let tax_total = doc.tax_total();
    if tax_total > Decimal::ZERO {
        let tax = resolve(accounts, doc.accounts.tax, doc, AccountRole::Tax)?;
        lines.push(JournalLine::debit(tax, "Input tax", tax_total));
    }
    lines.push(JournalLine::credit(
        payable,
        &format!("Bill {}", doc.number),
        doc.total_amount(),
    ));

    Ok(PostingPlan {
        entries: vec![new_entry(
            doc,
            doc.number.clone(),
            format!("Bill {}", doc.number),
            posted_by,
            lines,
        )],
        inventory_moves: moves,
    })
}

/// DR receivable, CR revenue, CR tax; stocked lines add a second entry
/// DR COGS / CR inventory at cost basis.
fn plan_invoice(
    doc: &Document,
    products: &HashMap<ProductId, Product>,
    accounts: &HashMap<AccountId, Account>,
    posted_by: UserId,
) -> Result<PostingPlan, ValidationError> {
    let receivable = resolve(accounts, doc.accounts.receivable, doc, AccountRole::Receivable)?;
    let revenue = resolve(accounts, doc.accounts.revenue, doc, AccountRole::Revenue)?;

    let mut lines = vec![JournalLine::debit(
        receivable,
        &format!("Invoice {}", doc.number),
        doc.total_amount(),
    )];
    let mut cogs_lines = Vec::new();
    let mut moves = Vec::new();

    for item in &doc.lines {
        lines.push(JournalLine::credit(revenue, &item.description, item.subtotal()));

        let Some(product) = stocked_product(products, item.product_id) else {
            continue;
        };
        let cost = (product.cost_price * item.quantity).round_dp(2);
        if cost > Decimal::ZERO {
            let cogs = resolve(accounts, doc.accounts.cogs, doc, AccountRole::Cogs)?;
            let inventory =
                resolve(accounts, doc.accounts.inventory, doc, AccountRole::Inventory)?;
            cogs_lines.push(JournalLine::debit(cogs, &item.description, cost));
            cogs_lines.push(JournalLine::credit(inventory, &item.description, cost));
        }
        if item.quantity != Decimal::ZERO {
            moves.push(InventoryMove {
                product_id: product.id,
                quantity: item.quantity,
                unit_cost: product.cost_price,
                transaction_type: InventoryTxnType::Sale,
            });
        }
    }

    let tax_total = doc.tax_total();
    if tax_total > Decimal::ZERO {
        let tax = resolve(accounts, doc.accounts.tax, doc, AccountRole::Tax)?;
        lines.push(JournalLine::credit(tax, "Output tax", tax_total));
    }

    let mut entries = vec![new_entry(
        doc,
        doc.number.clone(),
        format!("Invoice {}", doc.number),
        posted_by,
        lines,
    )];
    if !cogs_lines.is_empty() {
        entries.push(new_entry(
            doc,
            format!("{}-COGS", doc.number),
            format!("Cost of goods sold for invoice {}", doc.number),
            posted_by,
            cogs_lines,
        ));
    }

    Ok(PostingPlan {
        entries,
        inventory_moves: moves,
    })
}

/// DR payable, CR bank.
fn plan_payment(
    doc: &Document,
    accounts: &HashMap<AccountId, Account>,
    posted_by: UserId,
) -> Result<PostingPlan, ValidationError> {
    let payable = resolve(accounts, doc.accounts.payable, doc, AccountRole::Payable)?;
    let bank = resolve(accounts, doc.accounts.bank, doc, AccountRole::Bank)?;
    let amount = doc.total_amount();

    let lines = vec![
        JournalLine::debit(payable, &format!("Payment {}", doc.number), amount),
        JournalLine::credit(bank, &format!("Payment {}", doc.number), amount),
    ];

    Ok(PostingPlan {
        entries: vec![new_entry(
            doc,
            doc.number.clone(),
            format!("Payment {}", doc.number),
            posted_by,
            lines,
        )],
        inventory_moves: vec![],
    })
}

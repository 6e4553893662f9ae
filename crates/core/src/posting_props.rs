//! Property tests for plan construction.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use quill_shared::types::{AccountId, CompanyId, DocumentId, ProductId, UserId};

use crate::document::{Document, DocumentAccounts, DocumentKind, DocumentLine, DocumentStatus};
use crate::inventory::{Product, ProductType};
use crate::ledger::{Account, AccountType};
use crate::posting::build_plan;

struct World {
    accounts: HashMap<AccountId, Account>,
    roles: DocumentAccounts,
    products: HashMap<ProductId, Product>,
    product_ids: Vec<ProductId>,
    company_id: CompanyId,
}

fn world() -> World {
    let company_id = CompanyId::new();
    let mut accounts = HashMap::new();
    let mut add = |code: &str, ty: AccountType| {
        let a = Account::new(company_id, code, code, ty);
        let id = a.id;
        accounts.insert(id, a);
        id
    };
    let roles = DocumentAccounts {
        expense: Some(add("6000", AccountType::Expense)),
        payable: Some(add("2100", AccountType::Liability)),
        receivable: Some(add("1200", AccountType::Asset)),
        revenue: Some(add("4000", AccountType::Revenue)),
        tax: Some(add("2200", AccountType::Liability)),
        bank: Some(add("1000", AccountType::Asset)),
        inventory: Some(add("1300", AccountType::Asset)),
        cogs: Some(add("5000", AccountType::CostOfGoodsSold)),
    };
    let mut products = HashMap::new();
    let mut product_ids = Vec::new();
    for (name, cost) in [("Widget", 2000_i64), ("Gadget", 735), ("Freebie", 0)] {
        let p = Product {
            id: ProductId::new(),
            company_id,
            name: name.to_string(),
            product_type: ProductType::Inventory,
            cost_price: Decimal::new(cost, 2),
            quantity_on_hand: Decimal::new(1000, 0),
        };
        product_ids.push(p.id);
        products.insert(p.id, p);
    }
    World {
        accounts,
        roles,
        products,
        product_ids,
        company_id,
    }
}

fn arb_line() -> impl Strategy<Value = (Option<usize>, i64, i64, i64)> {
    (
        prop_oneof![Just(None), (0usize..3).prop_map(Some)],
        1i64..500,         // quantity, 1dp
        1i64..100_000,     // unit price, cents
        prop_oneof![Just(0i64), Just(5), Just(10), Just(11)], // tax %
    )
}

fn arb_kind() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::Bill),
        Just(DocumentKind::Invoice),
        Just(DocumentKind::Payment),
    ]
}

fn build_doc(w: &World, kind: DocumentKind, raw: &[(Option<usize>, i64, i64, i64)]) -> Document {
    let lines = raw
        .iter()
        .map(|&(product, qty, price, tax)| DocumentLine {
            // payments never carry product lines
            product_id: if kind == DocumentKind::Payment {
                None
            } else {
                product.map(|i| w.product_ids[i])
            },
            description: "line".to_string(),
            quantity: Decimal::new(qty, 1),
            unit_price: Decimal::new(price, 2),
            tax_rate: Decimal::new(tax, 2),
        })
        .collect();
    Document {
        id: DocumentId::new(),
        company_id: w.company_id,
        kind,
        number: "PROP-0001".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        lines,
        accounts: w.roles.clone(),
        status: DocumentStatus::Draft,
        amount_paid: Decimal::ZERO,
        journal_entry_id: None,
    }
}

proptest! {
    /// **Property 1.1**: every entry in a plan is balanced to the cent,
    /// for any document kind and any mix of service and stocked lines.
    #[test]
    fn prop_plan_entries_always_balanced(
        kind in arb_kind(),
        raw in prop::collection::vec(arb_line(), 1..6),
    ) {
        let w = world();
        let doc = build_doc(&w, kind, &raw);
        let plan = build_plan(&doc, &w.products, &w.accounts, UserId::new()).unwrap();
        for entry in &plan.entries {
            prop_assert!(entry.is_balanced(), "unbalanced entry {}", entry.reference);
            prop_assert_eq!(entry.total_debits(), entry.total_credits());
        }
    }

    /// **Property 1.2**: the primary entry's debit total equals the
    /// document's tax-inclusive total.
    #[test]
    fn prop_primary_entry_matches_document_total(
        kind in arb_kind(),
        raw in prop::collection::vec(arb_line(), 1..6),
    ) {
        let w = world();
        let doc = build_doc(&w, kind, &raw);
        let plan = build_plan(&doc, &w.products, &w.accounts, UserId::new()).unwrap();
        prop_assert_eq!(plan.entries[0].total_debits(), doc.total_amount());
    }

    /// **Property 1.3**: the COGS entry, when present, carries cost
    /// basis rather than selling price.
    #[test]
    fn prop_cogs_entry_uses_cost_basis(
        raw in prop::collection::vec(arb_line(), 1..6),
    ) {
        let w = world();
        let doc = build_doc(&w, DocumentKind::Invoice, &raw);
        let plan = build_plan(&doc, &w.products, &w.accounts, UserId::new()).unwrap();

        let expected_cost: Decimal = doc
            .lines
            .iter()
            .filter_map(|l| {
                let p = w.products.get(&l.product_id?)?;
                Some((p.cost_price * l.quantity).round_dp(2))
            })
            .sum();

        let cogs_total: Decimal = plan
            .entries
            .get(1)
            .map(crate::ledger::NewJournalEntry::total_debits)
            .unwrap_or_default();
        prop_assert_eq!(cogs_total, expected_cost);
    }
}

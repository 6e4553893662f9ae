//! Shared fixtures for engine integration tests.
#![allow(dead_code)] // not every test binary touches every fixture

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use quill_core::document::{
    Document, DocumentAccounts, DocumentKind, DocumentLine, DocumentStatus,
};
use quill_core::inventory::{Product, ProductType};
use quill_core::ledger::{Account, AccountType};
use quill_engine::Books;
use quill_shared::types::{AccountId, CompanyId, DocumentId, ProductId, UserId};
use quill_store::MemoryStore;

pub struct World {
    pub books: Books<MemoryStore>,
    pub company: CompanyId,
    pub user: UserId,
    pub roles: DocumentAccounts,
    pub expense: AccountId,
    pub payable: AccountId,
    pub receivable: AccountId,
    pub revenue: AccountId,
    pub tax: AccountId,
    pub bank: AccountId,
    pub inventory: AccountId,
    pub cogs: AccountId,
}

impl World {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let company = CompanyId::new();

        let mk = |code: &str, name: &str, ty: AccountType| Account::new(company, code, name, ty);
        let accounts = [
            mk("1000", "Bank", AccountType::Asset),
            mk("1200", "Accounts Receivable", AccountType::Asset),
            mk("1300", "Inventory", AccountType::Asset),
            mk("2100", "Accounts Payable", AccountType::Liability),
            mk("2200", "Tax Payable", AccountType::Liability),
            mk("4000", "Sales Revenue", AccountType::Revenue),
            mk("5000", "Cost of Goods Sold", AccountType::CostOfGoodsSold),
            mk("6000", "Office Supplies", AccountType::Expense),
        ];
        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        for account in accounts {
            store.seed_account(account).await;
        }
        let [bank, receivable, inventory, payable, tax, revenue, cogs, expense]: [AccountId; 8] =
            ids.try_into().unwrap();

        let roles = DocumentAccounts {
            expense: Some(expense),
            payable: Some(payable),
            receivable: Some(receivable),
            revenue: Some(revenue),
            tax: Some(tax),
            bank: Some(bank),
            inventory: Some(inventory),
            cogs: Some(cogs),
        };

        Self {
            books: Books::new(store),
            company,
            user: UserId::new(),
            roles,
            expense,
            payable,
            receivable,
            revenue,
            tax,
            bank,
            inventory,
            cogs,
        }
    }

    pub async fn stocked_product(&self, cost: Decimal, on_hand: Decimal) -> ProductId {
        let product = Product {
            id: ProductId::new(),
            company_id: self.company,
            name: "Widget".to_string(),
            product_type: ProductType::Inventory,
            cost_price: cost,
            quantity_on_hand: on_hand,
        };
        let id = product.id;
        self.books.store().seed_product(product).await;
        id
    }

    pub fn doc(&self, kind: DocumentKind, number: &str, status: DocumentStatus) -> Document {
        Document {
            id: DocumentId::new(),
            company_id: self.company,
            kind,
            number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            lines: Vec::new(),
            accounts: self.roles.clone(),
            status,
            amount_paid: Decimal::ZERO,
            journal_entry_id: None,
        }
    }

    pub async fn balance(&self, id: AccountId) -> Decimal {
        self.books.account_balance(id).await.unwrap()
    }
}

pub fn line(product_id: Option<ProductId>, qty: Decimal, price: Decimal, tax: Decimal) -> DocumentLine {
    DocumentLine {
        product_id,
        description: "line item".to_string(),
        quantity: qty,
        unit_price: price,
        tax_rate: tax,
    }
}

pub fn service_line(amount: Decimal, tax: Decimal) -> DocumentLine {
    line(None, dec!(1), amount, tax)
}

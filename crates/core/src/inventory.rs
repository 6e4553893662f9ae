//! Product catalog and inventory movement records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use quill_shared::types::{CompanyId, DocumentId, InventoryTransactionId, ProductId};

use crate::ledger::SourceType;

/// Whether a product carries stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Stocked goods; movements hit the inventory asset account.
    Inventory,
    /// Services; no stock, no COGS leg.
    Service,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// The product ID.
    pub id: ProductId,
    /// The owning company.
    pub company_id: CompanyId,
    /// Product name.
    pub name: String,
    /// Stocked goods or service.
    pub product_type: ProductType,
    /// Cost basis per unit; drives the COGS leg on sales.
    pub cost_price: Decimal,
    /// Current stock level.
    pub quantity_on_hand: Decimal,
}

impl Product {
    /// Whether movements of this product produce inventory side effects.
    #[must_use]
    pub const fn is_stocked(&self) -> bool {
        matches!(self.product_type, ProductType::Inventory)
    }
}

/// Direction of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryTxnType {
    /// Stock received from a bill.
    Purchase,
    /// Stock consumed by an invoice.
    Sale,
}

impl std::fmt::Display for InventoryTxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        };
        f.write_str(name)
    }
}

/// An immutable record of one stock movement.
///
/// Movements are never edited in place; corrections delete the record and
/// restore `quantity_on_hand` from its stored in/out quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTransaction {
    /// The transaction ID.
    pub id: InventoryTransactionId,
    /// The owning company.
    pub company_id: CompanyId,
    /// The product moved.
    pub product_id: ProductId,
    /// Units received (purchases).
    pub quantity_in: Decimal,
    /// Units consumed (sales).
    pub quantity_out: Decimal,
    /// Cost basis per unit at movement time.
    pub unit_cost: Decimal,
    /// `unit_cost` times the moved quantity.
    pub total_value: Decimal,
    /// The document kind that caused the movement.
    pub reference_type: SourceType,
    /// The causing document.
    pub reference_id: DocumentId,
    /// Purchase or sale.
    pub transaction_type: InventoryTxnType,
    /// Movement date.
    pub date: NaiveDate,
}

impl InventoryTransaction {
    /// Signed stock change this record applied (`in - out`).
    #[must_use]
    pub fn quantity_delta(&self) -> Decimal {
        self.quantity_in - self.quantity_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stocked_flag() {
        let mut p = Product {
            id: ProductId::new(),
            company_id: CompanyId::new(),
            name: "Widget".to_string(),
            product_type: ProductType::Inventory,
            cost_price: dec!(20),
            quantity_on_hand: dec!(0),
        };
        assert!(p.is_stocked());
        p.product_type = ProductType::Service;
        assert!(!p.is_stocked());
    }

    #[test]
    fn test_quantity_delta_signs() {
        let txn = InventoryTransaction {
            id: InventoryTransactionId::new(),
            company_id: CompanyId::new(),
            product_id: ProductId::new(),
            quantity_in: dec!(0),
            quantity_out: dec!(5),
            unit_cost: dec!(20),
            total_value: dec!(100),
            reference_type: SourceType::Invoice,
            reference_id: DocumentId::new(),
            transaction_type: InventoryTxnType::Sale,
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        };
        assert_eq!(txn.quantity_delta(), dec!(-5));
    }
}

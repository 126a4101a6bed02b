//! Inventory ledger rules.
//!
//! Every stock change is a ledger row; `products.current_stock` caches the
//! sum of the rows' stock deltas.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::Money;
use super::product::ProductSummary;
use crate::config::{MAX_MOVEMENT_QUANTITY, MAX_PRICE_CENTS};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Sale,
    Return,
    /// Stored quantity is the signed correction
    Adjustment,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Purchase,
        TransactionType::Sale,
        TransactionType::Return,
        TransactionType::Adjustment,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "purchase" | "in" => Some(TransactionType::Purchase),
            "sale" | "out" => Some(TransactionType::Sale),
            "return" => Some(TransactionType::Return),
            "adjustment" => Some(TransactionType::Adjustment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Sale => "sale",
            TransactionType::Return => "return",
            TransactionType::Adjustment => "adjustment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "Purchase",
            TransactionType::Sale => "Sale",
            TransactionType::Return => "Return",
            TransactionType::Adjustment => "Adjustment",
        }
    }

    /// Signed effect of a stored row on stock.
    pub fn stock_delta(&self, quantity: i32) -> i32 {
        match self {
            TransactionType::Purchase | TransactionType::Return => quantity,
            TransactionType::Sale => -quantity,
            TransactionType::Adjustment => quantity,
        }
    }

    /// Effect of a stored row on `total_sold`.
    pub fn sold_delta(&self, quantity: i32) -> i32 {
        match self {
            TransactionType::Sale => quantity,
            TransactionType::Return => -quantity,
            TransactionType::Purchase | TransactionType::Adjustment => 0,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryTransaction {
    pub id: i32,
    pub product_id: i32,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    pub unit_price: Money,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InventoryTransaction {
    pub fn stock_delta(&self) -> i32 {
        self.transaction_type.stock_delta(self.quantity)
    }
}

/// Ledger row joined with the product it belongs to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionWithProduct {
    #[serde(flatten)]
    pub transaction: InventoryTransaction,
    pub product_reference: String,
    pub product_name: String,
}

/// A requested stock movement, before it is checked against current stock.
///
/// For [`TransactionType::Adjustment`] `quantity` is the target stock level.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct StockMovement {
    pub product_id: i32,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Money,
    pub notes: Option<String>,
    #[serde(skip)]
    pub created_by: Option<String>,
}

impl StockMovement {
    /// Checks that do not need the current stock level.
    pub fn validate(&self) -> AppResult<()> {
        match self.transaction_type {
            TransactionType::Adjustment if self.quantity < 0 => Err(AppError::validation(
                "Target stock for an adjustment cannot be negative",
            )),
            TransactionType::Adjustment => Ok(()),
            _ if self.quantity <= 0 => {
                Err(AppError::validation("Quantity must be greater than zero"))
            }
            _ => Ok(()),
        }?;

        if self.quantity > MAX_MOVEMENT_QUANTITY {
            return Err(AppError::validation(format!(
                "Quantity cannot exceed {}",
                MAX_MOVEMENT_QUANTITY
            )));
        }
        if self.unit_price.is_negative() {
            return Err(AppError::validation("Unit price cannot be negative"));
        }
        if self.unit_price.cents() > MAX_PRICE_CENTS {
            return Err(AppError::validation(format!(
                "Unit price cannot exceed {}",
                Money::from_cents(MAX_PRICE_CENTS)
            )));
        }
        Ok(())
    }
}

/// A movement resolved against the stock level it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMovement {
    pub product_id: i32,
    pub transaction_type: TransactionType,
    /// Value stored in the ledger row
    pub quantity: i32,
    pub unit_price: Money,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub new_stock: i32,
    pub new_total_sold: i32,
}

/// Outcome of applying a movement.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementOutcome {
    Recorded(InventoryTransaction),
    /// Adjustment to the level the product already has
    NoChange,
}

fn out_of_range() -> AppError {
    AppError::validation("Movement would take stock counters out of range")
}

/// Resolve a movement against the product's current counters.
///
/// Returns `Ok(None)` for an adjustment to the current level. Rejects any
/// movement that would leave stock below zero or overflow a counter.
pub fn plan_movement(
    movement: &StockMovement,
    current_stock: i32,
    total_sold: i32,
) -> AppResult<Option<PlannedMovement>> {
    movement.validate()?;

    let stored_quantity = match movement.transaction_type {
        TransactionType::Adjustment => {
            let delta = movement
                .quantity
                .checked_sub(current_stock)
                .ok_or_else(out_of_range)?;
            if delta == 0 {
                return Ok(None);
            }
            delta
        }
        _ => movement.quantity,
    };

    let new_stock = current_stock
        .checked_add(movement.transaction_type.stock_delta(stored_quantity))
        .ok_or_else(out_of_range)?;
    if new_stock < 0 {
        return Err(AppError::validation(format!(
            "Insufficient stock: only {} unit{} available",
            current_stock,
            if current_stock == 1 { "" } else { "s" }
        )));
    }

    let new_total_sold = total_sold
        .checked_add(movement.transaction_type.sold_delta(stored_quantity))
        .ok_or_else(out_of_range)?
        .max(0);
    let total_amount = movement
        .unit_price
        .checked_mul(i64::from(stored_quantity.unsigned_abs()))
        .ok_or_else(out_of_range)?;

    Ok(Some(PlannedMovement {
        product_id: movement.product_id,
        transaction_type: movement.transaction_type,
        quantity: stored_quantity,
        unit_price: movement.unit_price,
        total_amount,
        notes: movement
            .notes
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_by: movement.created_by.clone(),
        new_stock,
        new_total_sold,
    }))
}

/// Stock level implied by a product's ledger rows.
pub fn derive_stock(entries: &[(TransactionType, i32)]) -> i32 {
    entries
        .iter()
        .map(|(kind, quantity)| kind.stock_delta(*quantity))
        .sum()
}

/// Σ stock × purchase price, saturating rather than wrapping.
pub fn inventory_value(levels: &[(i32, Money)]) -> Money {
    levels.iter().fold(Money::ZERO, |total, (stock, price)| {
        total.saturating_add(price.saturating_mul(i64::from((*stock).max(0))))
    })
}

/// Filters for the ledger screen. `to` is inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub product_id: Option<i32>,
    pub transaction_type: Option<TransactionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Build from raw query-string values; blank or malformed values are ignored.
    pub fn from_query(
        product: Option<&str>,
        kind: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Self {
        let date = |v: Option<&str>| {
            v.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        };
        Self {
            product_id: product.and_then(|p| p.trim().parse().ok()),
            transaction_type: kind.and_then(TransactionType::parse),
            from: date(from),
            to: date(to),
        }
    }

    /// Half-open UTC range `[from 00:00, to+1 00:00)`.
    pub fn time_range(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        let end = self
            .to
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        (start, end)
    }
}

/// Result of comparing a product's cached stock with its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockDrift {
    pub product_id: i32,
    pub reference: String,
    pub cached: i32,
    pub derived: i32,
}

/// Stock overview screen: every product plus the ones needing attention.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryOverview {
    pub products: Vec<ProductSummary>,
    /// 0 < stock <= threshold
    pub low_stock: Vec<ProductSummary>,
    /// stock <= 0
    pub out_of_stock: Vec<ProductSummary>,
    pub total_value: Money,
}

impl InventoryOverview {
    pub fn from_products(products: Vec<ProductSummary>, low_threshold: i32) -> Self {
        let levels: Vec<(i32, Money)> = products
            .iter()
            .map(|p| (p.product.current_stock, p.product.purchase_price))
            .collect();

        let low_stock = products
            .iter()
            .filter(|p| p.product.current_stock > 0 && p.product.current_stock <= low_threshold)
            .cloned()
            .collect();
        let out_of_stock = products
            .iter()
            .filter(|p| p.product.current_stock <= 0)
            .cloned()
            .collect();

        Self {
            total_value: inventory_value(&levels),
            products,
            low_stock,
            out_of_stock,
        }
    }
}

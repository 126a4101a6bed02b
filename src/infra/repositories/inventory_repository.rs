//! Inventory ledger repository.
//!
//! Ledger rows and the cached counters on `products` are only ever written
//! together, inside one transaction that holds a row lock on the product.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::base::fetch_page;
use super::entities::{inventory_transaction, product};
use crate::domain::inventory::{derive_stock, plan_movement};
use crate::domain::{
    InventoryTransaction, MovementOutcome, StockDrift, StockMovement, TransactionFilter,
    TransactionType, TransactionWithProduct,
};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Record a movement and update the product's counters atomically
    async fn apply_movement(&self, movement: StockMovement) -> AppResult<MovementOutcome>;

    /// One product's ledger, newest first
    async fn history(
        &self,
        product_id: i32,
        params: PaginationParams,
    ) -> AppResult<(Vec<InventoryTransaction>, u64)>;

    /// Ledger rows across products, newest first
    async fn list(
        &self,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<TransactionWithProduct>, u64)>;

    async fn recent(&self, limit: u64) -> AppResult<Vec<TransactionWithProduct>>;

    /// Products whose cached stock differs from the sum of their ledger
    async fn stock_drift(&self) -> AppResult<Vec<StockDrift>>;

    /// Overwrite the cached stock counter (reconciliation only)
    async fn set_cached_stock(&self, product_id: i32, stock: i32) -> AppResult<()>;
}

pub struct InventoryStore {
    db: Arc<DatabaseConnection>,
}

impl InventoryStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }
}

fn filtered(filter: &TransactionFilter) -> Select<inventory_transaction::Entity> {
    let mut select = inventory_transaction::Entity::find();

    if let Some(product_id) = filter.product_id {
        select = select.filter(inventory_transaction::Column::ProductId.eq(product_id));
    }
    if let Some(kind) = filter.transaction_type {
        select = select.filter(inventory_transaction::Column::TransactionType.eq(kind.as_str()));
    }
    let (start, end) = filter.time_range();
    if let Some(start) = start {
        select = select.filter(inventory_transaction::Column::CreatedAt.gte(start));
    }
    if let Some(end) = end {
        select = select.filter(inventory_transaction::Column::CreatedAt.lt(end));
    }

    select
        .order_by_desc(inventory_transaction::Column::CreatedAt)
        .order_by_desc(inventory_transaction::Column::Id)
}

fn with_product(
    rows: Vec<(inventory_transaction::Model, Option<product::Model>)>,
) -> Vec<TransactionWithProduct> {
    rows.into_iter()
        .map(|(row, product)| {
            let (product_reference, product_name) = product
                .map(|p| (p.reference, p.name))
                .unwrap_or_default();
            TransactionWithProduct {
                transaction: InventoryTransaction::from(row),
                product_reference,
                product_name,
            }
        })
        .collect()
}

#[async_trait]
impl InventoryRepository for InventoryStore {
    async fn apply_movement(&self, movement: StockMovement) -> AppResult<MovementOutcome> {
        let txn = self.db.begin().await?;

        let current = product::Entity::find_by_id(movement.product_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Product")?;

        let Some(plan) = plan_movement(&movement, current.current_stock, current.total_sold)?
        else {
            txn.rollback().await?;
            return Ok(MovementOutcome::NoChange);
        };

        let now = Utc::now();
        let row = inventory_transaction::ActiveModel {
            product_id: Set(plan.product_id),
            transaction_type: Set(plan.transaction_type.as_str().to_string()),
            quantity: Set(plan.quantity),
            unit_price: Set(plan.unit_price.cents()),
            total_amount: Set(plan.total_amount.cents()),
            notes: Set(plan.notes),
            created_by: Set(plan.created_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut active: product::ActiveModel = current.into();
        active.current_stock = Set(plan.new_stock);
        active.total_sold = Set(plan.new_total_sold);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            product_id = plan.product_id,
            kind = %plan.transaction_type,
            quantity = plan.quantity,
            new_stock = plan.new_stock,
            "Stock movement recorded"
        );

        Ok(MovementOutcome::Recorded(InventoryTransaction::from(row)))
    }

    async fn history(
        &self,
        product_id: i32,
        params: PaginationParams,
    ) -> AppResult<(Vec<InventoryTransaction>, u64)> {
        let filter = TransactionFilter {
            product_id: Some(product_id),
            ..Default::default()
        };
        let (rows, total) = fetch_page(self.db.as_ref(), filtered(&filter), params).await?;
        Ok((rows.into_iter().map(InventoryTransaction::from).collect(), total))
    }

    async fn list(
        &self,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<TransactionWithProduct>, u64)> {
        let paginator = filtered(&filter)
            .find_also_related(product::Entity)
            .paginate(self.db.as_ref(), params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page_index()).await?;

        Ok((with_product(rows), total))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<TransactionWithProduct>> {
        let rows = filtered(&TransactionFilter::default())
            .limit(limit)
            .find_also_related(product::Entity)
            .all(self.db.as_ref())
            .await?;

        Ok(with_product(rows))
    }

    async fn stock_drift(&self) -> AppResult<Vec<StockDrift>> {
        let entries: Vec<(i32, String, i32)> = inventory_transaction::Entity::find()
            .select_only()
            .column(inventory_transaction::Column::ProductId)
            .column(inventory_transaction::Column::TransactionType)
            .column(inventory_transaction::Column::Quantity)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        let mut ledgers: HashMap<i32, Vec<(TransactionType, i32)>> = HashMap::new();
        for (product_id, kind, quantity) in entries {
            let kind = TransactionType::parse(&kind).unwrap_or(TransactionType::Adjustment);
            ledgers.entry(product_id).or_default().push((kind, quantity));
        }

        let products: Vec<(i32, String, i32)> = product::Entity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Reference)
            .column(product::Column::CurrentStock)
            .order_by_asc(product::Column::Reference)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        Ok(products
            .into_iter()
            .filter_map(|(product_id, reference, cached)| {
                let derived = ledgers
                    .get(&product_id)
                    .map(|entries| derive_stock(entries))
                    .unwrap_or(0);
                (derived != cached).then_some(StockDrift {
                    product_id,
                    reference,
                    cached,
                    derived,
                })
            })
            .collect())
    }

    async fn set_cached_stock(&self, product_id: i32, stock: i32) -> AppResult<()> {
        let existing = product::Entity::find_by_id(product_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Product")?;

        let mut active: product::ActiveModel = existing.into();
        active.current_stock = Set(stock);
        active.updated_at = Set(Utc::now());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }
}

//! Inventory service - the stock ledger and its views.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LOW_STOCK_THRESHOLD;
use crate::domain::inventory::inventory_value;
use crate::domain::{
    InventoryOverview, InventoryTransaction, Money, MovementOutcome, Product, ProductFilter,
    ProductSort, ProductSummary, StockDrift, StockMovement, TransactionFilter,
    TransactionWithProduct,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn overview(&self) -> AppResult<InventoryOverview>;

    /// Products with `0 < stock <= threshold`, lowest first
    async fn low_stock(&self, threshold: i32) -> AppResult<Vec<ProductSummary>>;

    /// Σ stock × purchase price
    async fn total_value(&self) -> AppResult<Money>;

    async fn record_movement(&self, movement: StockMovement) -> AppResult<MovementOutcome>;

    async fn transactions(
        &self,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<TransactionWithProduct>>;

    async fn product_history(
        &self,
        product_id: i32,
        params: PaginationParams,
    ) -> AppResult<(Product, Paginated<InventoryTransaction>)>;

    /// Compare cached stock with the ledger; with `apply` the cache is rewritten
    async fn reconcile(&self, apply: bool) -> AppResult<Vec<StockDrift>>;
}

pub struct InventoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> InventoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn all_by_stock(&self) -> AppResult<Vec<ProductSummary>> {
        self.uow
            .products()
            .list(ProductFilter {
                sort: ProductSort::Stock,
                ..ProductFilter::default()
            })
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> InventoryService for InventoryManager<U> {
    async fn overview(&self) -> AppResult<InventoryOverview> {
        let products = self.all_by_stock().await?;
        Ok(InventoryOverview::from_products(products, LOW_STOCK_THRESHOLD))
    }

    async fn low_stock(&self, threshold: i32) -> AppResult<Vec<ProductSummary>> {
        let products = self.all_by_stock().await?;
        Ok(InventoryOverview::from_products(products, threshold.max(1)).low_stock)
    }

    async fn total_value(&self) -> AppResult<Money> {
        let levels = self.uow.products().stock_levels().await?;
        Ok(inventory_value(&levels))
    }

    async fn record_movement(&self, movement: StockMovement) -> AppResult<MovementOutcome> {
        movement.validate()?;
        let outcome = self.uow.inventory().apply_movement(movement.clone()).await?;

        if outcome == MovementOutcome::NoChange {
            tracing::debug!(
                product_id = movement.product_id,
                target = movement.quantity,
                "Adjustment skipped, stock already at target"
            );
        }
        Ok(outcome)
    }

    async fn transactions(
        &self,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<TransactionWithProduct>> {
        let (rows, total) = self.uow.inventory().list(filter, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn product_history(
        &self,
        product_id: i32,
        params: PaginationParams,
    ) -> AppResult<(Product, Paginated<InventoryTransaction>)> {
        let product = self
            .uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;

        let (rows, total) = self.uow.inventory().history(product_id, params).await?;
        Ok((product, Paginated::new(rows, params, total)))
    }

    async fn reconcile(&self, apply: bool) -> AppResult<Vec<StockDrift>> {
        let drift = self.uow.inventory().stock_drift().await?;

        for item in &drift {
            tracing::warn!(
                product_id = item.product_id,
                reference = %item.reference,
                cached = item.cached,
                derived = item.derived,
                "Cached stock differs from ledger"
            );
            if apply {
                self.uow
                    .inventory()
                    .set_cached_stock(item.product_id, item.derived)
                    .await?;
            }
        }

        if apply && !drift.is_empty() {
            tracing::info!(fixed = drift.len(), "Stock cache reconciled");
        }
        Ok(drift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use crate::errors::AppError;
    use crate::infra::{
        InventoryRepository, MockInventoryRepository, MockProductRepository, MockUnitOfWork,
        ProductRepository,
    };

    fn manager(
        inventory: MockInventoryRepository,
        products: MockProductRepository,
    ) -> InventoryManager<MockUnitOfWork> {
        let inventory: Arc<dyn InventoryRepository> = Arc::new(inventory);
        let products: Arc<dyn ProductRepository> = Arc::new(products);
        let mut uow = MockUnitOfWork::new();
        uow.expect_inventory().returning(move || inventory.clone());
        uow.expect_products().returning(move || products.clone());
        InventoryManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_invalid_movement_never_reaches_repository() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_apply_movement().never();

        let err = manager(inventory, MockProductRepository::new())
            .record_movement(StockMovement {
                product_id: 1,
                transaction_type: TransactionType::Sale,
                quantity: 0,
                unit_price: Money::ZERO,
                notes: None,
                created_by: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reconcile_apply_rewrites_cache() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_stock_drift().returning(|| {
            Ok(vec![StockDrift {
                product_id: 4,
                reference: "AN-4".to_string(),
                cached: 7,
                derived: 5,
            }])
        });
        inventory
            .expect_set_cached_stock()
            .withf(|id, stock| *id == 4 && *stock == 5)
            .times(1)
            .returning(|_, _| Ok(()));

        let drift = manager(inventory, MockProductRepository::new())
            .reconcile(true)
            .await
            .unwrap();
        assert_eq!(drift.len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_report_only() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_stock_drift().returning(|| {
            Ok(vec![StockDrift {
                product_id: 4,
                reference: "AN-4".to_string(),
                cached: 7,
                derived: 5,
            }])
        });
        inventory.expect_set_cached_stock().never();

        manager(inventory, MockProductRepository::new())
            .reconcile(false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_total_value() {
        let mut products = MockProductRepository::new();
        products.expect_stock_levels().returning(|| {
            Ok(vec![
                (2, Money::from_cents(1500)),
                (-1, Money::from_cents(900)),
            ])
        });

        let value = manager(MockInventoryRepository::new(), products)
            .total_value()
            .await
            .unwrap();
        assert_eq!(value.cents(), 3000);
    }

    #[tokio::test]
    async fn test_history_of_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_history().never();

        let err = manager(inventory, products)
            .product_history(99, PaginationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

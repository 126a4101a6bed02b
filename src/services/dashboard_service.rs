use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{DASHBOARD_LOW_STOCK_THRESHOLD, DASHBOARD_RECENT_LIMIT};
use crate::domain::inventory::inventory_value;
use crate::domain::{Dashboard, DashboardStats};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn dashboard(&self) -> AppResult<Dashboard>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn dashboard(&self) -> AppResult<Dashboard> {
        let products = self.uow.products();
        let families = self.uow.families();
        let inventory = self.uow.inventory();

        let (
            product_count,
            family_count,
            low_stock_count,
            out_of_stock_count,
            levels,
            recent_products,
            recent_transactions,
        ) = futures::try_join!(
            products.count(),
            families.count(),
            products.count_in_stock_range(0, DASHBOARD_LOW_STOCK_THRESHOLD),
            products.count_out_of_stock(),
            products.stock_levels(),
            products.recent(DASHBOARD_RECENT_LIMIT),
            inventory.recent(DASHBOARD_RECENT_LIMIT),
        )?;

        Ok(Dashboard {
            stats: DashboardStats {
                product_count,
                family_count,
                low_stock_count,
                out_of_stock_count,
                inventory_value: inventory_value(&levels),
            },
            recent_products,
            recent_transactions,
        })
    }
}

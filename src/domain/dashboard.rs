//! Figures shown on the admin dashboard.

use serde::Serialize;

use super::inventory::TransactionWithProduct;
use super::money::Money;
use super::product::ProductSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub product_count: u64,
    pub family_count: u64,
    /// 0 < stock < 5
    pub low_stock_count: u64,
    /// stock <= 0
    pub out_of_stock_count: u64,
    pub inventory_value: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_products: Vec<ProductSummary>,
    pub recent_transactions: Vec<TransactionWithProduct>,
}

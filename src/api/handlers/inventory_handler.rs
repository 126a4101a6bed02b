//! Inventory endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::LOW_STOCK_THRESHOLD;
use crate::domain::{
    InventoryTransaction, Money, MovementOutcome, Product, ProductSummary, StockMovement,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Admin inventory routes, mounted under `/api/admin/inventory`
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_movement))
        .route("/low-stock", get(low_stock))
        .route("/value", get(inventory_value))
        .route("/:product_id", get(product_history))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LowStockQuery {
    /// Upper bound, inclusive (default 10)
    pub threshold: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductHistory {
    pub product: Product,
    #[schema(value_type = Object)]
    pub transactions: Paginated<InventoryTransaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryValue {
    /// Σ stock × purchase price, in cents
    pub total_value: Money,
    /// Same amount formatted for display
    #[schema(example = "€1.234,56")]
    pub formatted: String,
}

/// Stock level and ledger of one product
#[utoipa::path(
    get,
    path = "/api/admin/inventory/{product_id}",
    tag = "Inventory",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Product and its transactions", body = ProductHistory),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn product_history(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(query): Query<PaginationParams>,
) -> AppResult<ApiResponse<ProductHistory>> {
    let params = PaginationParams::new(query.page, query.per_page);

    let (product, transactions) = state
        .services
        .inventory()
        .product_history(product_id, params)
        .await?;
    Ok(ApiResponse::success(ProductHistory {
        product,
        transactions,
    }))
}

/// Record a stock movement
///
/// For `adjustment` the quantity is the target stock level.
#[utoipa::path(
    post,
    path = "/api/admin/inventory",
    tag = "Inventory",
    request_body = StockMovement,
    responses(
        (status = 201, description = "Movement recorded", body = InventoryTransaction),
        (status = 200, description = "Adjustment matched current stock, nothing recorded"),
        (status = 400, description = "Invalid movement or insufficient stock"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_movement(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<StockMovement>, JsonRejection>,
) -> AppResult<Response> {
    let Json(mut movement) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    movement.created_by = Some(user.username().to_string());

    match state.services.inventory().record_movement(movement).await? {
        MovementOutcome::Recorded(tx) => Ok(Created(tx).into_response()),
        MovementOutcome::NoChange => Ok(ApiResponse::message("No adjustment needed").into_response()),
    }
}

/// Products with `0 < stock <= threshold`
#[utoipa::path(
    get,
    path = "/api/admin/inventory/low-stock",
    tag = "Inventory",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Low stock products, lowest first", body = [ProductSummary])
    ),
    security(("bearer_auth" = []))
)]
pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<ApiResponse<Vec<ProductSummary>>> {
    let threshold = query.threshold.unwrap_or(LOW_STOCK_THRESHOLD).max(0);
    let products = state.services.inventory().low_stock(threshold).await?;
    Ok(ApiResponse::success(products))
}

/// Total inventory value at purchase price
#[utoipa::path(
    get,
    path = "/api/admin/inventory/value",
    tag = "Inventory",
    responses(
        (status = 200, description = "Inventory value", body = InventoryValue)
    ),
    security(("bearer_auth" = []))
)]
pub async fn inventory_value(State(state): State<AppState>) -> AppResult<ApiResponse<InventoryValue>> {
    let total_value = state.services.inventory().total_value().await?;
    Ok(ApiResponse::success(InventoryValue {
        total_value,
        formatted: total_value.format_eur(),
    }))
}

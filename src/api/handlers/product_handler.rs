//! Product endpoints: the public catalog feed and admin CRUD.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{CATALOG_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::domain::{Product, ProductDetail, ProductFilter, ProductInput, ProductSort, ProductSummary};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Listing query
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// 1-indexed page number
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Family id
    pub family: Option<String>,
    /// Matched against reference and name
    pub search: Option<String>,
    /// reference | name | sale_price | stock | created_at (admin only)
    pub sort: Option<String>,
    /// asc | desc (admin only)
    pub order: Option<String>,
}

impl ProductQuery {
    fn params(&self, default_per_page: u64) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_per_page),
        )
    }
}

/// Public product routes, mounted under `/api/products`
pub fn public_product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public))
        .route("/featured", get(featured))
        .route("/family/:id", get(by_family))
        .route("/:id", get(public_product))
}

/// Admin product routes, mounted under `/api/admin/products`
pub fn admin_product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Active products, featured first
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of active products", body = [ProductSummary])
    )
)]
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<Paginated<ProductSummary>>> {
    let mut filter =
        ProductFilter::from_query(query.family.as_deref(), query.search.as_deref(), None, None)
            .with_active_only();
    filter.sort = ProductSort::Featured;

    let page = state
        .services
        .products()
        .list(filter, query.params(CATALOG_PAGE_SIZE))
        .await?;
    Ok(ApiResponse::success(page))
}

/// Featured active products
#[utoipa::path(
    get,
    path = "/api/products/featured",
    tag = "Catalog",
    responses(
        (status = 200, description = "Featured products", body = [ProductSummary])
    )
)]
pub async fn featured(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ProductSummary>>> {
    let products = state.services.products().featured().await?;
    Ok(ApiResponse::success(products))
}

/// Active products of one family
#[utoipa::path(
    get,
    path = "/api/products/family/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Family id")),
    responses(
        (status = 200, description = "Products of the family", body = [ProductSummary]),
        (status = 404, description = "Family not found")
    )
)]
pub async fn by_family(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Vec<ProductSummary>>> {
    let family = state.services.families().get(id).await?;
    let products = state.services.products().by_family(family.id).await?;
    Ok(ApiResponse::success(products))
}

/// One active product with its family and images
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, description = "Product not found or not active")
    )
)]
pub async fn public_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let detail = state.services.products().get_public(id).await?;
    Ok(ApiResponse::success(detail))
}

/// All products, any status
#[utoipa::path(
    get,
    path = "/api/admin/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of products", body = [ProductSummary]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<Paginated<ProductSummary>>> {
    let filter = ProductFilter::from_query(
        query.family.as_deref(),
        query.search.as_deref(),
        query.sort.as_deref(),
        query.order.as_deref(),
    );

    let page = state
        .services
        .products()
        .list(filter, query.params(DEFAULT_PAGE_SIZE))
        .await?;
    Ok(ApiResponse::success(page))
}

/// Create a product; a positive `initial_stock` is booked as a purchase
#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Reference already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> AppResult<Created<Product>> {
    let product = state
        .services
        .products()
        .create(input, Vec::new(), Some(user.username().to_string()))
        .await?;
    Ok(Created(product))
}

/// Product with family and images
#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let detail = state.services.products().get(id).await?;
    Ok(ApiResponse::success(detail))
}

/// Update product fields; stock is left alone
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Reference already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.services.products().update(id, input, Vec::new()).await?;
    Ok(ApiResponse::success(product))
}

/// Delete a product with its images and ledger rows
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.services.products().delete(id).await?;
    Ok(ApiResponse::message("Product deleted"))
}

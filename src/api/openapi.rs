//! OpenAPI documentation configuration.
//!
//! Served as JSON at `/api-docs/openapi.json` and browsable at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, family_handler, inventory_handler, product_handler};
use crate::domain::{
    Family, FamilyInput, FamilyWithCount, InventoryTransaction, Money, Product, ProductDetail,
    ProductImage, ProductInput, ProductSummary, StockMovement, TransactionType,
};
use crate::services::TokenResponse;
use crate::types::PaginationMeta;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gonzaga's Catalog API",
        version = "0.1.0",
        description = "Jewelry catalog and inventory. Responses use the `{ success, data, message }` envelope."
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::issue_token,
        // Public catalog
        product_handler::list_public,
        product_handler::featured,
        product_handler::by_family,
        product_handler::public_product,
        family_handler::list_families,
        // Admin products
        product_handler::list_all,
        product_handler::create_product,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Admin families
        family_handler::list_with_counts,
        family_handler::create_family,
        family_handler::update_family,
        family_handler::delete_family,
        // Admin inventory
        inventory_handler::product_history,
        inventory_handler::record_movement,
        inventory_handler::low_stock,
        inventory_handler::inventory_value,
    ),
    components(
        schemas(
            Money,
            Family,
            FamilyInput,
            FamilyWithCount,
            Product,
            ProductImage,
            ProductSummary,
            ProductDetail,
            ProductInput,
            TransactionType,
            InventoryTransaction,
            StockMovement,
            PaginationMeta,
            TokenResponse,
            auth_handler::TokenRequest,
            inventory_handler::ProductHistory,
            inventory_handler::InventoryValue,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "API tokens"),
        (name = "Catalog", description = "Public catalog data"),
        (name = "Products", description = "Product management"),
        (name = "Families", description = "Product family management"),
        (name = "Inventory", description = "Stock ledger")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT obtained from /api/auth/token"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_api_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/products"));
        assert!(paths.contains_key("/api/admin/products/{id}"));
        assert!(paths.contains_key("/api/admin/inventory/low-stock"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}

//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_family_routes, admin_product_routes, auth_routes, inventory_routes,
    public_family_routes, public_product_routes,
};
use super::middleware::{
    admin_session_middleware, api_auth_middleware, login_rate_limit_middleware,
    site_gate_middleware,
};
use super::openapi::ApiDoc;
use super::pages::{auth, catalog, checkpoints, contacts, dashboard, families, inventory, products};
use super::session::session_middleware;
use super::AppState;
use crate::config::MAX_IMAGE_UPLOAD_BYTES;

/// Room for a few images plus the text fields of one product form.
const PRODUCT_FORM_BODY_LIMIT: usize = 4 * MAX_IMAGE_UPLOAD_BYTES;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let media_root = state.media.root().to_path_buf();

    Router::new()
        .merge(public_pages(&state))
        .route(
            "/site-password",
            get(catalog::site_password_form).post(catalog::site_password_submit),
        )
        // Sign in (POSTs rate limited per client)
        .route(
            "/admin/login",
            get(auth::login_form).post(auth::login_submit).route_layer(
                middleware::from_fn_with_state(state.clone(), login_rate_limit_middleware),
            ),
        )
        .route("/admin", get(auth::admin_root))
        .route("/admin/logout", post(auth::logout))
        .merge(admin_pages())
        .nest("/api", api_routes(&state))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/media", ServeDir::new(media_root))
        // Global middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Catalog pages behind the optional site password
fn public_pages(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::home))
        .route("/catalog", get(catalog::catalog))
        .route("/collections", get(catalog::collections))
        .route("/collection/:family_id", get(catalog::collection))
        .route("/product/:id", get(catalog::product))
        .route("/about", get(catalog::about))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            site_gate_middleware,
        ))
}

/// Back office, signed-in users only
fn admin_pages() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard::dashboard))
        // Products
        .route("/admin/products", get(products::list))
        .route(
            "/admin/products/add",
            get(products::add_form)
                .post(products::add)
                .layer(DefaultBodyLimit::max(PRODUCT_FORM_BODY_LIMIT)),
        )
        .route(
            "/admin/products/edit/:id",
            get(products::edit_form)
                .post(products::edit)
                .layer(DefaultBodyLimit::max(PRODUCT_FORM_BODY_LIMIT)),
        )
        .route("/admin/products/delete/:id", post(products::delete))
        .route(
            "/admin/products/:id/images/:image_id/delete",
            post(products::delete_image),
        )
        .route(
            "/admin/products/:id/images/:image_id/primary",
            post(products::set_primary_image),
        )
        // Families
        .route("/admin/families", get(families::list))
        .route(
            "/admin/families/add",
            get(families::add_form).post(families::add),
        )
        .route(
            "/admin/families/edit/:id",
            get(families::edit_form).post(families::edit),
        )
        .route("/admin/families/delete/:id", post(families::delete))
        // Inventory
        .route("/admin/inventory", get(inventory::overview))
        .route("/admin/inventory/transactions", get(inventory::transactions))
        .route("/admin/inventory/product/:id", get(inventory::product_history))
        .route("/admin/inventory/movement", post(inventory::record_movement))
        // Customers
        .route("/admin/customers", get(contacts::customer_list))
        .route(
            "/admin/customers/add",
            get(contacts::customer_add_form).post(contacts::customer_add),
        )
        .route(
            "/admin/customers/edit/:id",
            get(contacts::customer_edit_form).post(contacts::customer_edit),
        )
        .route("/admin/customers/delete/:id", post(contacts::customer_delete))
        .route("/admin/customers/restore/:id", post(contacts::customer_restore))
        // Suppliers
        .route("/admin/suppliers", get(contacts::supplier_list))
        .route(
            "/admin/suppliers/add",
            get(contacts::supplier_add_form).post(contacts::supplier_add),
        )
        .route(
            "/admin/suppliers/edit/:id",
            get(contacts::supplier_edit_form).post(contacts::supplier_edit),
        )
        .route("/admin/suppliers/toggle/:id", post(contacts::supplier_toggle))
        .route("/admin/suppliers/delete/:id", post(contacts::supplier_delete))
        .route("/admin/suppliers/restore/:id", post(contacts::supplier_restore))
        // Checkpoints
        .route("/admin/checkpoints", get(checkpoints::list))
        .route("/admin/checkpoints/create", post(checkpoints::create))
        .route("/admin/checkpoints/restore/:id", post(checkpoints::restore))
        .route("/admin/checkpoints/delete/:id", post(checkpoints::delete))
        .route_layer(middleware::from_fn(admin_session_middleware))
}

/// JSON API: public catalog data plus `/admin` behind a token or session
fn api_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .nest("/products", admin_product_routes())
        .nest("/families", admin_family_routes())
        .nest("/inventory", inventory_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_auth_middleware,
        ));

    Router::new()
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit_middleware,
            )),
        )
        .nest("/products", public_product_routes())
        .nest("/families", public_family_routes())
        .nest("/admin", admin)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    sessions: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Database and session store connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, sessions) = tokio::join!(state.database.ping(), state.sessions.ping());
    let database = ServiceStatus::from_result(db);
    let sessions = ServiceStatus::from_result(sessions);

    let all_healthy = database.is_healthy() && sessions.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, sessions },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

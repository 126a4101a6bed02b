//! Customer and supplier screens.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;

use super::{admin_page, finish_action, form_message, PageResult};
use crate::api::middleware::CurrentUser;
use crate::api::session::SessionHandle;
use crate::api::views::contacts as view;
use crate::api::AppState;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{ContactFilter, CustomerInput, FlashKind, SupplierInput};
use crate::types::PaginationParams;

const CUSTOMERS_PATH: &str = "/admin/customers";
const SUPPLIERS_PATH: &str = "/admin/suppliers";

#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub show: Option<String>,
    pub active: Option<String>,
}

impl ContactQuery {
    fn filter(&self) -> ContactFilter {
        ContactFilter::from_query(
            self.search.as_deref(),
            self.show.as_deref(),
            self.active.as_deref(),
        )
    }

    fn params(&self) -> PaginationParams {
        PaginationParams::from_raw(self.page.as_deref(), DEFAULT_PAGE_SIZE)
    }
}

/// Listing to go back to after acting on a deleted record.
fn deleted_list(path: &str) -> String {
    format!("{}?show=deleted", path)
}

// -----------------------------------------------------------------------------
// Customers
// -----------------------------------------------------------------------------

pub async fn customer_list(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Query(query): Query<ContactQuery>,
) -> PageResult<Html<String>> {
    let filter = query.filter();
    let page = state
        .services
        .customers()
        .list(filter.clone(), query.params())
        .await?;
    let body = view::customer_list(&page, &filter);
    Ok(admin_page(&state, &session, &user, "Customers", &body).await)
}

pub async fn customer_add_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> Html<String> {
    let body = view::customer_form(None, &CustomerInput::default(), None);
    admin_page(&state, &session, &user, "Add customer", &body).await
}

pub async fn customer_add(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Form(input): Form<CustomerInput>,
) -> PageResult {
    match state.services.customers().create(input.clone()).await {
        Ok(customer) => {
            session
                .flash(FlashKind::Success, format!("Customer '{}' created", customer.name))
                .await;
            Ok(Redirect::to(CUSTOMERS_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::customer_form(None, &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Add customer", &body)
                .await
                .into_response())
        }
    }
}

pub async fn customer_edit_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let customer = state.services.customers().get(id).await?;
    let body = view::customer_form(Some(id), &CustomerInput::from(&customer), None);
    Ok(admin_page(&state, &session, &user, "Edit customer", &body).await)
}

pub async fn customer_edit(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(input): Form<CustomerInput>,
) -> PageResult {
    match state.services.customers().update(id, input.clone()).await {
        Ok(customer) => {
            session
                .flash(FlashKind::Success, format!("Customer '{}' updated", customer.name))
                .await;
            Ok(Redirect::to(CUSTOMERS_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::customer_form(Some(id), &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Edit customer", &body)
                .await
                .into_response())
        }
    }
}

pub async fn customer_delete(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.customers().delete(id).await;
    finish_action(&session, result, |_| "Customer deleted".to_string(), CUSTOMERS_PATH).await
}

pub async fn customer_restore(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.customers().restore(id).await;
    finish_action(
        &session,
        result,
        |c| format!("Customer '{}' restored", c.name),
        &deleted_list(CUSTOMERS_PATH),
    )
    .await
}

// -----------------------------------------------------------------------------
// Suppliers
// -----------------------------------------------------------------------------

pub async fn supplier_list(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Query(query): Query<ContactQuery>,
) -> PageResult<Html<String>> {
    let filter = query.filter();
    let page = state
        .services
        .suppliers()
        .list(filter.clone(), query.params())
        .await?;
    let body = view::supplier_list(&page, &filter);
    Ok(admin_page(&state, &session, &user, "Suppliers", &body).await)
}

pub async fn supplier_add_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> Html<String> {
    let body = view::supplier_form(None, &SupplierInput::default(), None);
    admin_page(&state, &session, &user, "Add supplier", &body).await
}

pub async fn supplier_add(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Form(input): Form<SupplierInput>,
) -> PageResult {
    match state.services.suppliers().create(input.clone()).await {
        Ok(supplier) => {
            session
                .flash(FlashKind::Success, format!("Supplier '{}' created", supplier.name))
                .await;
            Ok(Redirect::to(SUPPLIERS_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::supplier_form(None, &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Add supplier", &body)
                .await
                .into_response())
        }
    }
}

pub async fn supplier_edit_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let supplier = state.services.suppliers().get(id).await?;
    let body = view::supplier_form(Some(id), &SupplierInput::from(&supplier), None);
    Ok(admin_page(&state, &session, &user, "Edit supplier", &body).await)
}

pub async fn supplier_edit(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(input): Form<SupplierInput>,
) -> PageResult {
    match state.services.suppliers().update(id, input.clone()).await {
        Ok(supplier) => {
            session
                .flash(FlashKind::Success, format!("Supplier '{}' updated", supplier.name))
                .await;
            Ok(Redirect::to(SUPPLIERS_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::supplier_form(Some(id), &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Edit supplier", &body)
                .await
                .into_response())
        }
    }
}

pub async fn supplier_toggle(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.suppliers().toggle_active(id).await;
    finish_action(
        &session,
        result,
        |s| {
            let status = if s.is_active { "activated" } else { "deactivated" };
            format!("Supplier '{}' {}", s.name, status)
        },
        SUPPLIERS_PATH,
    )
    .await
}

pub async fn supplier_delete(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.suppliers().delete(id).await;
    finish_action(&session, result, |_| "Supplier deleted".to_string(), SUPPLIERS_PATH).await
}

pub async fn supplier_restore(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.suppliers().restore(id).await;
    finish_action(
        &session,
        result,
        |s| format!("Supplier '{}' restored", s.name),
        &deleted_list(SUPPLIERS_PATH),
    )
    .await
}

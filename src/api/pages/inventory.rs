//! Stock overview, ledger and movements.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;

use super::{admin_page, finish_action, PageResult};
use crate::api::forms::{safe_return_path, MovementForm};
use crate::api::middleware::CurrentUser;
use crate::api::session::SessionHandle;
use crate::api::views::inventory as view;
use crate::api::AppState;
use crate::config::TRANSACTIONS_PAGE_SIZE;
use crate::domain::{MovementOutcome, TransactionFilter};
use crate::types::PaginationParams;

const OVERVIEW_PATH: &str = "/admin/inventory";

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub page: Option<String>,
    pub product: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn overview(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> PageResult<Html<String>> {
    let data = state.services.inventory().overview().await?;
    Ok(admin_page(&state, &session, &user, "Inventory", &view::overview(&data)).await)
}

pub async fn transactions(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Query(query): Query<TransactionQuery>,
) -> PageResult<Html<String>> {
    let filter = TransactionFilter::from_query(
        query.product.as_deref(),
        query.kind.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    );
    let params = PaginationParams::from_raw(query.page.as_deref(), TRANSACTIONS_PAGE_SIZE);

    let page = state
        .services
        .inventory()
        .transactions(filter.clone(), params)
        .await?;

    let body = view::transactions(&page, &filter);
    Ok(admin_page(&state, &session, &user, "Inventory transactions", &body).await)
}

pub async fn product_history(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> PageResult<Html<String>> {
    let params = PaginationParams::from_raw(query.page.as_deref(), TRANSACTIONS_PAGE_SIZE);
    let (product, page) = state.services.inventory().product_history(id, params).await?;

    let title = format!("Stock history: {}", product.reference);
    let body = view::history(&product, &page);
    Ok(admin_page(&state, &session, &user, &title, &body).await)
}

pub async fn record_movement(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Form(form): Form<MovementForm>,
) -> PageResult {
    let back = safe_return_path(form.return_to.as_deref(), OVERVIEW_PATH);

    let result = match form.to_movement(Some(user.username().to_string())) {
        Ok(movement) => state.services.inventory().record_movement(movement).await,
        Err(e) => Err(e),
    };

    finish_action(
        &session,
        result,
        |outcome| match outcome {
            MovementOutcome::Recorded(tx) => format!(
                "{} of {} recorded",
                tx.transaction_type.label(),
                tx.quantity.abs()
            ),
            MovementOutcome::NoChange => "No adjustment needed".to_string(),
        },
        &back,
    )
    .await
}

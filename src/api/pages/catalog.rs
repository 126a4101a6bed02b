//! Public catalog pages.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::{public_page, PageResult};
use crate::api::forms::{safe_return_path, SitePasswordForm};
use crate::api::session::SessionHandle;
use crate::api::views::catalog as view;
use crate::api::AppState;
use crate::config::CATALOG_PAGE_SIZE;
use crate::domain::password::secret_matches;
use crate::domain::{ProductFilter, ProductSort};
use crate::types::PaginationParams;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<String>,
    pub family: Option<String>,
    pub search: Option<String>,
}

pub async fn home(State(state): State<AppState>, session: SessionHandle) -> PageResult<Html<String>> {
    let products = state.services.products();
    let families = state.services.families();

    let (featured, families, gallery) = futures::try_join!(
        products.featured(),
        families.list(),
        state.media.gallery()
    )?;

    let body = view::home(&featured, &families, &gallery);
    Ok(public_page(&state, &session, "Home", &body).await)
}

pub async fn catalog(
    State(state): State<AppState>,
    session: SessionHandle,
    Query(query): Query<CatalogQuery>,
) -> PageResult<Html<String>> {
    let mut filter = ProductFilter::from_query(
        query.family.as_deref(),
        query.search.as_deref(),
        None,
        None,
    )
    .with_active_only();
    filter.sort = ProductSort::Featured;

    let params = PaginationParams::from_raw(query.page.as_deref(), CATALOG_PAGE_SIZE);
    let family_id = filter.family_id;
    let search = filter.search.clone();

    let products = state.services.products();
    let families = state.services.families();
    let (page, families) = futures::try_join!(products.list(filter, params), families.list())?;

    let body = view::catalog(&page, &families, family_id, search.as_deref());
    Ok(public_page(&state, &session, "Catalog", &body).await)
}

pub async fn collections(
    State(state): State<AppState>,
    session: SessionHandle,
) -> PageResult<Html<String>> {
    let families = state.services.families();
    let (gallery, families) =
        futures::try_join!(state.media.gallery(), families.list_with_counts())?;

    let body = view::collections(&gallery, &families);
    Ok(public_page(&state, &session, "Gallery", &body).await)
}

pub async fn collection(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(family_id): Path<i32>,
) -> PageResult<Html<String>> {
    let family = state.services.families().get(family_id).await?;
    let products = state.services.products().by_family(family.id).await?;

    let body = view::collection(&family, &products);
    Ok(public_page(&state, &session, &family.name, &body).await)
}

pub async fn product(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let detail = state.services.products().get_public(id).await?;

    let body = view::product(&detail);
    Ok(public_page(&state, &session, &detail.product.name, &body).await)
}

pub async fn about(State(state): State<AppState>, session: SessionHandle) -> Html<String> {
    let body = view::about(&state.config.site_name);
    public_page(&state, &session, "About", &body).await
}

pub async fn site_password_form(
    State(state): State<AppState>,
    session: SessionHandle,
) -> Response {
    if state.config.site_password().is_none() || session.has_site_access().await {
        return Redirect::to("/").into_response();
    }
    public_page(&state, &session, "Private catalog", &view::site_password(false))
        .await
        .into_response()
}

pub async fn site_password_submit(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<SitePasswordForm>,
) -> Response {
    let Some(expected) = state.config.site_password() else {
        return Redirect::to("/").into_response();
    };

    if secret_matches(&form.password, expected) {
        session.grant_site_access().await;
        let target = session.take_return_to().await;
        tracing::info!("Site access granted");
        return Redirect::to(&safe_return_path(target.as_deref(), "/")).into_response();
    }

    tracing::debug!("Wrong site password");
    public_page(&state, &session, "Private catalog", &view::site_password(true))
        .await
        .into_response()
}

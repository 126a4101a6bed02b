//! Product management screens.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use super::{admin_page, finish_action, form_message, PageResult};
use crate::api::forms::ProductForm;
use crate::api::middleware::CurrentUser;
use crate::api::session::SessionHandle;
use crate::api::views::products as view;
use crate::api::AppState;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{FlashKind, ProductFilter, ProductImage};
use crate::errors::AppError;
use crate::services::ImageUpload;
use crate::types::PaginationParams;

const LIST_PATH: &str = "/admin/products";

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<String>,
    pub family: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Split a multipart submission into the text fields and the uploaded files.
async fn read_submission(mut multipart: Multipart) -> Result<(ProductForm, Vec<ImageUpload>), AppError> {
    let mut form = ProductForm::submitted();
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() && !data.is_empty() {
                    images.push(ImageUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.set_field(&name, value);
            }
        }
    }

    Ok((form, images))
}

async fn render_form(
    state: &AppState,
    session: &SessionHandle,
    user: &CurrentUser,
    id: Option<i32>,
    form: &ProductForm,
    images: &[ProductImage],
    error: Option<&str>,
) -> PageResult<Html<String>> {
    let families = state.services.families().list().await?;
    let title = if id.is_some() { "Edit product" } else { "Add product" };
    let body = view::form(id, form, &families, images, error);
    Ok(admin_page(state, session, user, title, &body).await)
}

pub async fn list(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> PageResult<Html<String>> {
    let filter = ProductFilter::from_query(
        query.family.as_deref(),
        query.search.as_deref(),
        query.sort.as_deref(),
        query.order.as_deref(),
    );
    let params = PaginationParams::from_raw(query.page.as_deref(), DEFAULT_PAGE_SIZE);

    let products = state.services.products();
    let families = state.services.families();
    let (page, families) = futures::try_join!(products.list(filter.clone(), params), families.list())?;

    let body = view::list(&page, &families, &filter);
    Ok(admin_page(&state, &session, &user, "Products", &body).await)
}

pub async fn add_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> PageResult<Html<String>> {
    render_form(&state, &session, &user, None, &ProductForm::default(), &[], None).await
}

pub async fn add(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    multipart: Multipart,
) -> PageResult {
    let (form, images) = read_submission(multipart).await?;

    let result = match form.to_input() {
        Ok(input) => {
            state
                .services
                .products()
                .create(input, images, Some(user.username().to_string()))
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(product) => {
            session
                .flash(
                    FlashKind::Success,
                    format!("Product '{}' created", product.reference),
                )
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            Ok(render_form(&state, &session, &user, None, &form, &[], Some(&message))
                .await?
                .into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> PageResult<Html<String>> {
    let detail = state.services.products().get(id).await?;
    let form = ProductForm::from_product(&detail.product);
    render_form(&state, &session, &user, Some(id), &form, &detail.images, None).await
}

pub async fn edit(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> PageResult {
    let (form, images) = read_submission(multipart).await?;

    let result = match form.to_input() {
        Ok(input) => state.services.products().update(id, input, images).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(product) => {
            session
                .flash(
                    FlashKind::Success,
                    format!("Product '{}' updated", product.reference),
                )
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let detail = state.services.products().get(id).await?;
            Ok(render_form(
                &state,
                &session,
                &user,
                Some(id),
                &form,
                &detail.images,
                Some(&message),
            )
            .await?
            .into_response())
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.products().delete(id).await;
    finish_action(&session, result, |_| "Product deleted".to_string(), LIST_PATH).await
}

pub async fn delete_image(
    State(state): State<AppState>,
    session: SessionHandle,
    Path((id, image_id)): Path<(i32, i32)>,
) -> PageResult {
    let result = state.services.products().delete_image(id, image_id).await;
    let back = format!("/admin/products/edit/{}", id);
    finish_action(&session, result, |_| "Image removed".to_string(), &back).await
}

pub async fn set_primary_image(
    State(state): State<AppState>,
    session: SessionHandle,
    Path((id, image_id)): Path<(i32, i32)>,
) -> PageResult {
    let result = state.services.products().set_primary_image(id, image_id).await;
    let back = format!("/admin/products/edit/{}", id);
    finish_action(&session, result, |_| "Primary image updated".to_string(), &back).await
}

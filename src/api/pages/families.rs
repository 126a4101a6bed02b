//! Product family management.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    Form,
};

use super::{admin_page, finish_action, form_message, PageResult};
use crate::api::middleware::CurrentUser;
use crate::api::session::SessionHandle;
use crate::api::views::admin as view;
use crate::api::AppState;
use crate::domain::{Family, FamilyInput, FlashKind};

const LIST_PATH: &str = "/admin/families";

fn blank() -> FamilyInput {
    FamilyInput {
        code: String::new(),
        name: String::new(),
        description: None,
    }
}

fn from_family(family: &Family) -> FamilyInput {
    FamilyInput {
        code: family.code.clone(),
        name: family.name.clone(),
        description: family.description.clone(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> PageResult<Html<String>> {
    let families = state.services.families().list_with_counts().await?;
    Ok(admin_page(&state, &session, &user, "Families", &view::family_list(&families)).await)
}

pub async fn add_form(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> Html<String> {
    let body = view::family_form(None, &blank(), None);
    admin_page(&state, &session, &user, "Add family", &body).await
}

pub async fn add(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Form(input): Form<FamilyInput>,
) -> PageResult {
    match state.services.families().create(input.clone()).await {
        Ok(family) => {
            session
                .flash(FlashKind::Success, format!("Family '{}' created", family.name))
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::family_form(None, &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Add family", &body)
                .await
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
    let family = state.services.families().get(id).await?;
    let body = view::family_form(Some(id), &from_family(&family), None);
    Ok(admin_page(&state, &session, &user, "Edit family", &body).await)
}

pub async fn edit(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
    Form(input): Form<FamilyInput>,
) -> PageResult {
    match state.services.families().update(id, input.clone()).await {
        Ok(family) => {
            session
                .flash(FlashKind::Success, format!("Family '{}' updated", family.name))
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            let message = form_message(e)?;
            let body = view::family_form(Some(id), &input, Some(&message));
            Ok(admin_page(&state, &session, &user, "Edit family", &body)
                .await
                .into_response())
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    session: SessionHandle,
    Path(id): Path<i32>,
) -> PageResult {
    let result = state.services.families().delete(id).await;
    finish_action(&session, result, |_| "Family deleted".to_string(), LIST_PATH).await
}

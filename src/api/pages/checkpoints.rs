//! Database checkpoints screen.

use axum::{
    extract::{Path, State},
    response::Html,
    Form,
};

use super::{admin_page, finish_action, PageResult};
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::session::SessionHandle;
use crate::api::views::admin as view;
use crate::api::AppState;
use crate::domain::CheckpointInput;

const LIST_PATH: &str = "/admin/checkpoints";

pub async fn list(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> PageResult<Html<String>> {
    let checkpoints = state.services.checkpoints().list().await?;
    let body = view::checkpoint_list(&checkpoints, &user.0);
    Ok(admin_page(&state, &session, &user, "Checkpoints", &body).await)
}

pub async fn create(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Form(input): Form<CheckpointInput>,
) -> PageResult {
    let result = state
        .services
        .checkpoints()
        .create(input, Some(user.username().to_string()))
        .await;
    finish_action(
        &session,
        result,
        |cp| format!("Checkpoint '{}' created", cp.checkpoint_name),
        LIST_PATH,
    )
    .await
}

pub async fn restore(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> PageResult {
    require_admin(&user)?;
    tracing::warn!(checkpoint_id = id, username = %user.username(), "Restoring checkpoint");

    let result = state.services.checkpoints().restore(id).await;
    finish_action(
        &session,
        result,
        |cp| format!("Database restored from '{}'", cp.checkpoint_name),
        LIST_PATH,
    )
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> PageResult {
    require_admin(&user)?;

    let result = state.services.checkpoints().delete(id).await;
    finish_action(&session, result, |_| "Checkpoint deleted".to_string(), LIST_PATH).await
}

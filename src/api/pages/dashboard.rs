use axum::{extract::State, response::Html};

use super::{admin_page, PageResult};
use crate::api::middleware::CurrentUser;
use crate::api::session::SessionHandle;
use crate::api::views::admin as view;
use crate::api::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    session: SessionHandle,
    user: CurrentUser,
) -> PageResult<Html<String>> {
    let data = state.services.dashboard().dashboard().await?;
    Ok(admin_page(&state, &session, &user, "Dashboard", &view::dashboard(&data)).await)
}

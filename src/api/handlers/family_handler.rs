//! Product family endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Family, FamilyInput, FamilyWithCount};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Public family routes, mounted under `/api/families`
pub fn public_family_routes() -> Router<AppState> {
    Router::new().route("/", get(list_families))
}

/// Admin family routes, mounted under `/api/admin/families`
pub fn admin_family_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_with_counts).post(create_family))
        .route("/:id", put(update_family).delete(delete_family))
}

/// All families, ordered by name
#[utoipa::path(
    get,
    path = "/api/families",
    tag = "Catalog",
    responses(
        (status = 200, description = "Families", body = [Family])
    )
)]
pub async fn list_families(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Family>>> {
    let families = state.services.families().list().await?;
    Ok(ApiResponse::success(families))
}

/// Families with the number of products in each
#[utoipa::path(
    get,
    path = "/api/admin/families",
    tag = "Families",
    responses(
        (status = 200, description = "Families with product counts", body = [FamilyWithCount]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_with_counts(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FamilyWithCount>>> {
    let families = state.services.families().list_with_counts().await?;
    Ok(ApiResponse::success(families))
}

#[utoipa::path(
    post,
    path = "/api/admin/families",
    tag = "Families",
    request_body = FamilyInput,
    responses(
        (status = 201, description = "Family created", body = Family),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_family(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<FamilyInput>,
) -> AppResult<Created<Family>> {
    let family = state.services.families().create(input).await?;
    Ok(Created(family))
}

#[utoipa::path(
    put,
    path = "/api/admin/families/{id}",
    tag = "Families",
    params(("id" = i32, Path, description = "Family id")),
    request_body = FamilyInput,
    responses(
        (status = 200, description = "Family updated", body = Family),
        (status = 404, description = "Family not found"),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_family(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<FamilyInput>,
) -> AppResult<ApiResponse<Family>> {
    let family = state.services.families().update(id, input).await?;
    Ok(ApiResponse::success(family))
}

/// Delete a family that no product uses
#[utoipa::path(
    delete,
    path = "/api/admin/families/{id}",
    tag = "Families",
    params(("id" = i32, Path, description = "Family id")),
    responses(
        (status = 200, description = "Family deleted"),
        (status = 404, description = "Family not found"),
        (status = 409, description = "Family still has products")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_family(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.services.families().delete(id).await?;
    Ok(ApiResponse::message("Family deleted"))
}

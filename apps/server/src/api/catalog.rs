//! System types and the budget item catalog. Any signed-in staff member may
//! read them; only staff admins change them.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use septic_core::{
    budget_items::{BudgetItem, BudgetItemFilter, BudgetItemInput},
    system_types::{NewSystemType, SystemType, SystemTypeUpdate},
};

use crate::{
    auth::{AuthUser, CATALOG_WRITE},
    error::ApiResult,
    main_lib::AppState,
};

async fn list_system_types(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SystemType>>> {
    Ok(Json(state.system_type_service.list_system_types()?))
}

async fn create_system_type(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(new_type): Json<NewSystemType>,
) -> ApiResult<Json<SystemType>> {
    user.require(CATALOG_WRITE)?;
    Ok(Json(
        state
            .system_type_service
            .create_system_type(new_type)
            .await?,
    ))
}

async fn update_system_type(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(update): Json<SystemTypeUpdate>,
) -> ApiResult<Json<SystemType>> {
    user.require(CATALOG_WRITE)?;
    Ok(Json(
        state
            .system_type_service
            .update_system_type(&id, update)
            .await?,
    ))
}

async fn delete_system_type(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(CATALOG_WRITE)?;
    state.system_type_service.delete_system_type(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/budget-items",
    params(
        ("active" = Option<bool>, Query, description = "Only active (true) or inactive (false) items"),
        ("category" = Option<String>, Query, description = "Exact category")
    ),
    responses((status = 200, description = "Catalog items ordered by category and name"))
)]
pub async fn list_budget_items(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<BudgetItemFilter>,
) -> ApiResult<Json<Vec<BudgetItem>>> {
    Ok(Json(state.budget_item_service.list_items(filter)?))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.budget_item_service.list_categories()?))
}

async fn get_budget_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BudgetItem>> {
    Ok(Json(state.budget_item_service.get_item(&id)?))
}

async fn create_budget_item(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<BudgetItemInput>,
) -> ApiResult<Json<BudgetItem>> {
    user.require(CATALOG_WRITE)?;
    Ok(Json(state.budget_item_service.create_item(input).await?))
}

async fn update_budget_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<BudgetItemInput>,
) -> ApiResult<Json<BudgetItem>> {
    user.require(CATALOG_WRITE)?;
    Ok(Json(state.budget_item_service.update_item(&id, input).await?))
}

async fn delete_budget_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(CATALOG_WRITE)?;
    state.budget_item_service.delete_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/system-types",
            get(list_system_types).post(create_system_type),
        )
        .route(
            "/system-types/{id}",
            put(update_system_type).delete(delete_system_type),
        )
        .route(
            "/budget-items",
            get(list_budget_items).post(create_budget_item),
        )
        .route("/budget-items/categories", get(list_categories))
        .route(
            "/budget-items/{id}",
            get(get_budget_item)
                .put(update_budget_item)
                .delete(delete_budget_item),
        )
}

//! Works and the materials logged against them. Field staff may read works,
//! move their status and log materials; creating, editing and deleting works
//! stays with the front office. Work details carry amounts only for finance
//! roles.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use septic_core::{
    materials::{Material, NewMaterial},
    works::{NewWork, Work, WorkDetail, WorkFilter, WorkStatusUpdate, WorkUpdate},
};

use crate::{
    auth::{AuthUser, FINANCE, WORKS_FIELD, WORKS_MANAGE},
    error::ApiResult,
    main_lib::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/works",
    params(
        ("status" = Option<String>, Query, description = "Work status, e.g. PENDING or COVERED"),
        ("staffId" = Option<String>, Query, description = "Assigned staff member")
    ),
    responses((status = 200, description = "Works, newest first"))
)]
pub async fn list_works(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<WorkFilter>,
) -> ApiResult<Json<Vec<Work>>> {
    user.require(WORKS_FIELD)?;
    Ok(Json(state.work_service.list_works(filter)?))
}

async fn get_work(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<WorkDetail>> {
    user.require(WORKS_FIELD)?;
    let detail = state.work_service.get_work_detail(&id)?;
    if user.has_any(FINANCE) {
        Ok(Json(detail))
    } else {
        Ok(Json(detail.without_finances()))
    }
}

async fn create_work(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(work): Json<NewWork>,
) -> ApiResult<Json<Work>> {
    user.require(WORKS_MANAGE)?;
    Ok(Json(state.work_service.create_work(work).await?))
}

async fn update_work(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(update): Json<WorkUpdate>,
) -> ApiResult<Json<Work>> {
    user.require(WORKS_MANAGE)?;
    Ok(Json(state.work_service.update_work(&id, update).await?))
}

async fn delete_work(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(WORKS_MANAGE)?;
    state.work_service.delete_work(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<WorkStatusUpdate>,
) -> ApiResult<Json<Work>> {
    user.require(WORKS_FIELD)?;
    let work = state.work_service.update_status(&id, payload.status).await?;
    tracing::info!(work_id = %id, status = %work.status, "work status updated");
    Ok(Json(work))
}

async fn list_materials(
    Path(work_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Material>>> {
    user.require(WORKS_FIELD)?;
    Ok(Json(state.material_service.list_for_work(&work_id)?))
}

async fn add_material(
    Path(work_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(material): Json<NewMaterial>,
) -> ApiResult<Json<Material>> {
    user.require(WORKS_FIELD)?;
    Ok(Json(
        state
            .material_service
            .add_material(&work_id, material)
            .await?,
    ))
}

async fn update_material(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(material): Json<NewMaterial>,
) -> ApiResult<Json<Material>> {
    user.require(WORKS_FIELD)?;
    Ok(Json(
        state
            .material_service
            .update_material(&id, material)
            .await?,
    ))
}

async fn delete_material(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(WORKS_FIELD)?;
    state.material_service.delete_material(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/works", get(list_works).post(create_work))
        .route(
            "/works/{id}",
            get(get_work).put(update_work).delete(delete_work),
        )
        .route("/works/{id}/status", put(update_status))
        .route(
            "/works/{id}/materials",
            get(list_materials).post(add_material),
        )
        .route(
            "/materials/{id}",
            put(update_material).delete(delete_material),
        )
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use septic_core::{
    balance::{BalanceFilter, BalanceReport, WorkBalance},
    utils::today,
};

use crate::{
    api::file_response,
    auth::{AuthUser, FINANCE},
    error::ApiResult,
    main_lib::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/balance",
    params(
        ("startDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("endDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("workId" = Option<String>, Query, description = "Limit to one work"),
        ("staffId" = Option<String>, Query, description = "Limit to one staff member")
    ),
    responses((status = 200, description = "Totals, per-type groups and the rows with their receipts"))
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<BalanceFilter>,
) -> ApiResult<Json<BalanceReport>> {
    user.require(FINANCE)?;
    Ok(Json(state.balance_service.get_balance(filter)?))
}

async fn get_work_balance(
    Path(work_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<WorkBalance>> {
    user.require(FINANCE)?;
    Ok(Json(state.balance_service.get_work_balance(&work_id)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/balance/export",
    responses((status = 200, description = "The balance report as a CSV attachment", content_type = "text/csv"))
)]
pub async fn export_balance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<BalanceFilter>,
) -> ApiResult<Response> {
    user.require(FINANCE)?;
    let csv = state.balance_service.export_balance_csv(filter)?;
    let file_name = format!("balance-{}.csv", today().format("%Y-%m-%d"));
    Ok(file_response(csv, "text/csv; charset=utf-8", &file_name))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/balance", get(get_balance))
        .route("/balance/works/{id}", get(get_work_balance))
        .route("/balance/export", get(export_balance))
}

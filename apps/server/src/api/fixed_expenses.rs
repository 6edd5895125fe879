use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use septic_core::{
    finance::Expense,
    fixed_expenses::{FixedExpense, NewFixedExpense},
    utils::today,
};

use crate::{
    auth::{AuthUser, FINANCE},
    error::ApiResult,
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpenseQuery {
    is_active: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Generate as if today were this date.
    as_of: Option<NaiveDate>,
}

async fn list_fixed_expenses(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<FixedExpenseQuery>,
) -> ApiResult<Json<Vec<FixedExpense>>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .fixed_expense_service
            .list_fixed_expenses(query.is_active)?,
    ))
}

async fn get_fixed_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FixedExpense>> {
    user.require(FINANCE)?;
    Ok(Json(state.fixed_expense_service.get_fixed_expense(&id)?))
}

async fn create_fixed_expense(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(fixed): Json<NewFixedExpense>,
) -> ApiResult<Json<FixedExpense>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .fixed_expense_service
            .create_fixed_expense(fixed)
            .await?,
    ))
}

async fn update_fixed_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(fixed): Json<NewFixedExpense>,
) -> ApiResult<Json<FixedExpense>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .fixed_expense_service
            .update_fixed_expense(&id, fixed)
            .await?,
    ))
}

async fn delete_fixed_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FINANCE)?;
    state.fixed_expense_service.delete_fixed_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the same generation the scheduler runs, on demand.
#[utoipa::path(
    post,
    path = "/api/v1/fixed-expenses/generate",
    responses((status = 200, description = "Expenses created for every elapsed period"))
)]
pub async fn generate_due(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Option<Json<GenerateRequest>>,
) -> ApiResult<Json<Vec<Expense>>> {
    user.require(FINANCE)?;
    let as_of = payload
        .and_then(|Json(request)| request.as_of)
        .unwrap_or_else(today);
    let generated = state.fixed_expense_service.generate_due(as_of).await?;
    tracing::info!(count = generated.len(), %as_of, "fixed expenses generated on demand");
    Ok(Json(generated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/fixed-expenses",
            get(list_fixed_expenses).post(create_fixed_expense),
        )
        .route("/fixed-expenses/generate", post(generate_due))
        .route(
            "/fixed-expenses/{id}",
            get(get_fixed_expense)
                .put(update_fixed_expense)
                .delete(delete_fixed_expense),
        )
}

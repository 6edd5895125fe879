use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use septic_core::budgets::{
    Budget, BudgetFilter, BudgetInput, BudgetStatusUpdate, InitialPaymentInput,
    InitialPaymentResult,
};

use crate::{
    auth::{AuthUser, FRONT_OFFICE},
    error::ApiResult,
    main_lib::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/budgets",
    params(
        ("status" = Option<String>, Query, description = "Budget status, e.g. DRAFT or APPROVED"),
        ("search" = Option<String>, Query, description = "Substring of address or applicant")
    ),
    responses((status = 200, description = "Budgets with their line items"))
)]
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<BudgetFilter>,
) -> ApiResult<Json<Vec<Budget>>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.budget_service.list_budgets(filter)?))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Budget>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.budget_service.get_budget(&id)?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<BudgetInput>,
) -> ApiResult<Json<Budget>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.budget_service.create_budget(input).await?))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<BudgetInput>,
) -> ApiResult<Json<Budget>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.budget_service.update_budget(&id, input).await?))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FRONT_OFFICE)?;
    state.budget_service.delete_budget(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<BudgetStatusUpdate>,
) -> ApiResult<Json<Budget>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(
        state
            .budget_service
            .update_status(&id, payload.status)
            .await?,
    ))
}

/// Marks the budget paid, opens its work and books the income in one step.
#[utoipa::path(
    post,
    path = "/api/v1/budgets/{id}/initial-payment",
    params(("id" = String, Path, description = "Budget id")),
    responses(
        (status = 200, description = "The paid budget, the new work and the income"),
        (status = 400, description = "Budget is not approved or already has a work"),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn record_initial_payment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Option<Json<InitialPaymentInput>>,
) -> ApiResult<Json<InitialPaymentResult>> {
    user.require(FRONT_OFFICE)?;
    let input = payload.map(|Json(input)| input).unwrap_or_default();
    let result = state
        .budget_service
        .record_initial_payment(&id, input, user.staff_id.clone())
        .await?;
    tracing::info!(
        budget_id = %id,
        work_id = %result.work.id,
        amount = %result.income.amount,
        "initial payment recorded"
    );
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/status", put(update_status))
        .route(
            "/budgets/{id}/initial-payment",
            post(record_initial_payment),
        )
}

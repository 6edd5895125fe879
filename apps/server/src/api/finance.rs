use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use septic_core::finance::{
    Expense, ExpenseFilter, Income, IncomeFilter, NewExpense, NewIncome,
};

use crate::{
    auth::{AuthUser, FINANCE},
    error::ApiResult,
    main_lib::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/incomes",
    params(
        ("startDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("endDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("incomeType" = Option<String>, Query, description = "Income type"),
        ("workId" = Option<String>, Query, description = "Work the income belongs to"),
        ("staffId" = Option<String>, Query, description = "Staff member who recorded it")
    ),
    responses((status = 200, description = "Incomes, newest first"))
)]
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<IncomeFilter>,
) -> ApiResult<Json<Vec<Income>>> {
    user.require(FINANCE)?;
    Ok(Json(state.finance_service.list_incomes(filter)?))
}

async fn get_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Income>> {
    user.require(FINANCE)?;
    Ok(Json(state.finance_service.get_income(&id)?))
}

/// The caller is recorded as the staff member unless the body names one.
async fn create_income(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(mut income): Json<NewIncome>,
) -> ApiResult<Json<Income>> {
    user.require(FINANCE)?;
    if income.staff_id.is_none() {
        income.staff_id = user.staff_id.clone();
    }
    Ok(Json(state.finance_service.create_income(income).await?))
}

async fn update_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(income): Json<NewIncome>,
) -> ApiResult<Json<Income>> {
    user.require(FINANCE)?;
    Ok(Json(state.finance_service.update_income(&id, income).await?))
}

async fn delete_income(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FINANCE)?;
    state.finance_service.delete_income(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(
        ("startDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("endDate" = Option<String>, Query, description = "Inclusive, YYYY-MM-DD"),
        ("expenseType" = Option<String>, Query, description = "Expense type"),
        ("workId" = Option<String>, Query, description = "Work the expense belongs to"),
        ("staffId" = Option<String>, Query, description = "Staff member who recorded it")
    ),
    responses((status = 200, description = "Expenses, newest first"))
)]
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(filter): Query<ExpenseFilter>,
) -> ApiResult<Json<Vec<Expense>>> {
    user.require(FINANCE)?;
    Ok(Json(state.finance_service.list_expenses(filter)?))
}

async fn get_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Expense>> {
    user.require(FINANCE)?;
    Ok(Json(state.finance_service.get_expense(&id)?))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(mut expense): Json<NewExpense>,
) -> ApiResult<Json<Expense>> {
    user.require(FINANCE)?;
    if expense.staff_id.is_none() {
        expense.staff_id = user.staff_id.clone();
    }
    Ok(Json(state.finance_service.create_expense(expense).await?))
}

async fn update_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(expense): Json<NewExpense>,
) -> ApiResult<Json<Expense>> {
    user.require(FINANCE)?;
    Ok(Json(
        state.finance_service.update_expense(&id, expense).await?,
    ))
}

async fn delete_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FINANCE)?;
    state.finance_service.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/incomes", get(list_incomes).post(create_income))
        .route(
            "/incomes/{id}",
            get(get_income).put(update_income).delete(delete_income),
        )
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

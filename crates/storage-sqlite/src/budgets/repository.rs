use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::{BudgetChangeset, BudgetDB, BudgetLineItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::finance::insert_income;
use crate::schema::{budget_line_items, budgets, works};
use crate::utils::chunk_for_sqlite;
use crate::works::WorkDB;
use septic_core::budgets::{
    Budget, BudgetFilter, BudgetRepositoryTrait, BudgetStatus, InitialPaymentResult,
    NewBudget, NewBudgetLineItem, NewInitialPayment,
};
use septic_core::finance::{IncomeType, NewIncome};
use septic_core::works::Work;
use septic_core::Result;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_line_items(conn: &mut SqliteConnection, budget_id: &str) -> Result<Vec<BudgetLineItemDB>> {
    budget_line_items::table
        .filter(budget_line_items::budget_id.eq(budget_id))
        .order(budget_line_items::position.asc())
        .select(BudgetLineItemDB::as_select())
        .load(conn)
        .into_core()
}

fn load_budget(conn: &mut SqliteConnection, budget_id: &str) -> Result<Budget> {
    let row = budgets::table
        .find(budget_id)
        .select(BudgetDB::as_select())
        .first(conn)
        .or_not_found("Budget", budget_id)?;
    let items = load_line_items(conn, budget_id)?;
    Ok(row.into_domain(items))
}

fn stored_status(conn: &mut SqliteConnection, budget_id: &str) -> Result<BudgetStatus> {
    let status: String = budgets::table
        .find(budget_id)
        .select(budgets::status)
        .first(conn)
        .or_not_found("Budget", budget_id)?;
    status.parse()
}

fn insert_line_items(
    conn: &mut SqliteConnection,
    budget_id: &str,
    items: Vec<NewBudgetLineItem>,
) -> Result<()> {
    let rows: Vec<BudgetLineItemDB> = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| BudgetLineItemDB::from_new(budget_id, position as i32, item))
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(budget_line_items::table)
        .values(&rows)
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn create(&self, budget: NewBudget) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let row = BudgetDB::from_new(&budget, Utc::now().naive_utc());
                let budget_id = row.id.clone();
                diesel::insert_into(budgets::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                insert_line_items(conn, &budget_id, budget.line_items)?;
                load_budget(conn, &budget_id)
            })
            .await
    }

    async fn update(&self, id: &str, budget: NewBudget) -> Result<Budget> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                stored_status(conn, &id)?.ensure_editable()?;
                let changes = BudgetChangeset::from_new(&budget, Utc::now().naive_utc());
                diesel::update(budgets::table.find(&id))
                    .set(&changes)
                    .execute(conn)
                    .into_core()?;
                diesel::delete(budget_line_items::table.filter(budget_line_items::budget_id.eq(&id)))
                    .execute(conn)
                    .into_core()?;
                insert_line_items(conn, &id, budget.line_items)?;
                load_budget(conn, &id)
            })
            .await
    }

    async fn update_status(&self, id: &str, status: BudgetStatus) -> Result<Budget> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                stored_status(conn, &id)?.ensure_transition(status)?;
                diesel::update(budgets::table.find(&id))
                    .set((
                        budgets::status.eq(status.as_str()),
                        budgets::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                load_budget(conn, &id)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Line items cascade; works keep their row with budget_id cleared.
                diesel::delete(budgets::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;
        load_budget(&mut conn, id)
    }

    fn list(&self, filter: &BudgetFilter) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = budgets::table.into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(budgets::status.eq(status.as_str()));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                budgets::property_address
                    .like(pattern.clone())
                    .or(budgets::applicant_name.like(pattern)),
            );
        }
        let rows = query
            .order((budgets::date.desc(), budgets::created_at.desc()))
            .select(BudgetDB::as_select())
            .load(&mut conn)
            .into_core()?;

        let ids: Vec<String> = rows.iter().map(|b| b.id.clone()).collect();
        let mut items_by_budget: HashMap<String, Vec<BudgetLineItemDB>> = HashMap::new();
        for chunk in chunk_for_sqlite(&ids) {
            let items = budget_line_items::table
                .filter(budget_line_items::budget_id.eq_any(chunk))
                .order((budget_line_items::budget_id.asc(), budget_line_items::position.asc()))
                .select(BudgetLineItemDB::as_select())
                .load(&mut conn)
                .into_core()?;
            for item in items {
                items_by_budget
                    .entry(item.budget_id.clone())
                    .or_default()
                    .push(item);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_budget.remove(&row.id).unwrap_or_default();
                row.into_domain(items)
            })
            .collect())
    }

    async fn record_initial_payment(
        &self,
        payment: NewInitialPayment,
    ) -> Result<InitialPaymentResult> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<InitialPaymentResult> {
                let now = Utc::now().naive_utc();
                stored_status(conn, &payment.budget_id)?.ensure_payable()?;
                diesel::update(budgets::table.find(&payment.budget_id))
                    .set((
                        budgets::status.eq(BudgetStatus::Paid.as_str()),
                        budgets::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;

                let work: Work = diesel::insert_into(works::table)
                    .values(&WorkDB::from_new(payment.work, now))
                    .returning(WorkDB::as_returning())
                    .get_result(conn)
                    .into_core()?
                    .into();

                let income = insert_income(
                    conn,
                    NewIncome {
                        date: payment.payment_date,
                        amount: payment.amount,
                        income_type: IncomeType::InitialPayment,
                        payment_method: payment.payment_method,
                        notes: payment.notes,
                        work_id: Some(work.id.clone()),
                        staff_id: payment.staff_id,
                    },
                )?;

                let budget = load_budget(conn, &payment.budget_id)?;
                Ok(InitialPaymentResult {
                    budget,
                    work,
                    income,
                })
            })
            .await
    }
}

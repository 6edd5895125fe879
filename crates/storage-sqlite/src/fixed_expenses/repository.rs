use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use super::model::{FixedExpenseChangeset, FixedExpenseDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::finance::insert_expense;
use crate::schema::fixed_expenses;
use septic_core::finance::Expense;
use septic_core::fixed_expenses::{
    FixedExpense, FixedExpenseRepositoryTrait, GeneratedPeriods, NewFixedExpense,
};
use septic_core::{Error, Result};

pub struct FixedExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FixedExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FixedExpenseRepositoryTrait for FixedExpenseRepository {
    async fn create(&self, fixed: NewFixedExpense) -> Result<FixedExpense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FixedExpense> {
                diesel::insert_into(fixed_expenses::table)
                    .values(&FixedExpenseDB::from_new(fixed, Utc::now().naive_utc()))
                    .returning(FixedExpenseDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(FixedExpense::from)
            })
            .await
    }

    async fn update(&self, id: &str, fixed: NewFixedExpense) -> Result<FixedExpense> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FixedExpense> {
                let stored_due: NaiveDate = fixed_expenses::table
                    .find(&id)
                    .select(fixed_expenses::next_due_date)
                    .first(conn)
                    .or_not_found("Fixed expense", &id)?;
                let next_due_date = fixed.next_due_date;
                diesel::update(fixed_expenses::table.find(&id))
                    .set(&FixedExpenseChangeset::from_new(fixed, Utc::now().naive_utc()))
                    .execute(conn)
                    .into_core()?;
                // A hand-edited due date starts a new schedule.
                if stored_due != next_due_date {
                    diesel::update(fixed_expenses::table.find(&id))
                        .set((
                            fixed_expenses::anchor_date.eq(next_due_date),
                            fixed_expenses::periods_generated.eq(0),
                        ))
                        .execute(conn)
                        .into_core()?;
                }
                fixed_expenses::table
                    .find(&id)
                    .select(FixedExpenseDB::as_select())
                    .first(conn)
                    .or_not_found("Fixed expense", &id)
                    .map(FixedExpense::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(fixed_expenses::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<FixedExpense> {
        let mut conn = get_connection(&self.pool)?;
        fixed_expenses::table
            .find(id)
            .select(FixedExpenseDB::as_select())
            .first(&mut conn)
            .or_not_found("Fixed expense", id)
            .map(FixedExpense::from)
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<FixedExpense>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = fixed_expenses::table.into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(fixed_expenses::is_active.eq(active));
        }
        let rows = query
            .order((fixed_expenses::next_due_date.asc(), fixed_expenses::name.asc()))
            .select(FixedExpenseDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(FixedExpense::from).collect())
    }

    fn list_due(&self, today: NaiveDate) -> Result<Vec<FixedExpense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = fixed_expenses::table
            .filter(fixed_expenses::is_active.eq(true))
            .filter(fixed_expenses::next_due_date.le(today))
            .order(fixed_expenses::next_due_date.asc())
            .select(FixedExpenseDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(FixedExpense::from).collect())
    }

    async fn record_generated(&self, run: GeneratedPeriods) -> Result<Vec<Expense>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Expense>> {
                let periods = i32::try_from(run.periods_generated)
                    .map_err(|_| Error::invalid("Too many generated periods"))?;
                let affected = diesel::update(
                    fixed_expenses::table
                        .find(&run.fixed_expense_id)
                        .filter(fixed_expenses::next_due_date.eq(run.planned_from)),
                )
                .set((
                    fixed_expenses::next_due_date.eq(run.next_due_date),
                    fixed_expenses::periods_generated.eq(periods),
                    fixed_expenses::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    let exists = diesel::select(diesel::dsl::exists(
                        fixed_expenses::table.find(&run.fixed_expense_id),
                    ))
                    .get_result::<bool>(conn)
                    .into_core()?;
                    if !exists {
                        return Err(Error::not_found("Fixed expense", &run.fixed_expense_id));
                    }
                    return Ok(Vec::new());
                }
                run.expenses
                    .into_iter()
                    .map(|expense| insert_expense(conn, expense))
                    .collect()
            })
            .await
    }
}

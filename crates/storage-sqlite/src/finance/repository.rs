use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::{ExpenseChangeset, ExpenseDB, IncomeChangeset, IncomeDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{expenses, incomes};
use septic_core::finance::{
    Expense, ExpenseFilter, ExpenseRepositoryTrait, Income, IncomeFilter, IncomeRepositoryTrait,
    NewExpense, NewIncome,
};
use septic_core::Result;

/// Inserts an income inside an open write transaction.
pub(crate) fn insert_income(conn: &mut SqliteConnection, income: NewIncome) -> Result<Income> {
    let row = IncomeDB::from_new(income, Utc::now().naive_utc());
    diesel::insert_into(incomes::table)
        .values(&row)
        .returning(IncomeDB::as_returning())
        .get_result(conn)
        .into_core()
        .map(Income::from)
}

/// Inserts an expense inside an open write transaction.
pub(crate) fn insert_expense(conn: &mut SqliteConnection, expense: NewExpense) -> Result<Expense> {
    let row = ExpenseDB::from_new(expense, Utc::now().naive_utc());
    diesel::insert_into(expenses::table)
        .values(&row)
        .returning(ExpenseDB::as_returning())
        .get_result(conn)
        .into_core()
        .map(Expense::from)
}

pub struct IncomeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl IncomeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl IncomeRepositoryTrait for IncomeRepository {
    async fn create(&self, income: NewIncome) -> Result<Income> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| insert_income(conn, income))
            .await
    }

    async fn update(&self, id: &str, income: NewIncome) -> Result<Income> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Income> {
                diesel::update(incomes::table.find(&id))
                    .set(&IncomeChangeset::from(income))
                    .returning(IncomeDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Income", &id)
                    .map(Income::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(incomes::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Income> {
        let mut conn = get_connection(&self.pool)?;
        incomes::table
            .find(id)
            .select(IncomeDB::as_select())
            .first(&mut conn)
            .or_not_found("Income", id)
            .map(Income::from)
    }

    fn list(&self, filter: &IncomeFilter) -> Result<Vec<Income>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = incomes::table.into_boxed();
        if let Some(start) = filter.start_date {
            query = query.filter(incomes::date.ge(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(incomes::date.le(end));
        }
        if let Some(income_type) = filter.income_type {
            query = query.filter(incomes::income_type.eq(income_type.as_str()));
        }
        if let Some(work_id) = filter.work_id.as_deref() {
            query = query.filter(incomes::work_id.eq(work_id.to_string()));
        }
        if let Some(staff_id) = filter.staff_id.as_deref() {
            query = query.filter(incomes::staff_id.eq(staff_id.to_string()));
        }
        let rows = query
            .order((incomes::date.desc(), incomes::created_at.desc()))
            .select(IncomeDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Income::from).collect())
    }
}

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    async fn create(&self, expense: NewExpense) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| insert_expense(conn, expense))
            .await
    }

    async fn update(&self, id: &str, expense: NewExpense) -> Result<Expense> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                diesel::update(expenses::table.find(&id))
                    .set(&ExpenseChangeset::from(expense))
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Expense", &id)
                    .map(Expense::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(expenses::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Expense> {
        let mut conn = get_connection(&self.pool)?;
        expenses::table
            .find(id)
            .select(ExpenseDB::as_select())
            .first(&mut conn)
            .or_not_found("Expense", id)
            .map(Expense::from)
    }

    fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = expenses::table.into_boxed();
        if let Some(start) = filter.start_date {
            query = query.filter(expenses::date.ge(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(expenses::date.le(end));
        }
        if let Some(expense_type) = filter.expense_type {
            query = query.filter(expenses::expense_type.eq(expense_type.as_str()));
        }
        if let Some(work_id) = filter.work_id.as_deref() {
            query = query.filter(expenses::work_id.eq(work_id.to_string()));
        }
        if let Some(staff_id) = filter.staff_id.as_deref() {
            query = query.filter(expenses::staff_id.eq(staff_id.to_string()));
        }
        let rows = query
            .order((expenses::date.desc(), expenses::created_at.desc()))
            .select(ExpenseDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }
}

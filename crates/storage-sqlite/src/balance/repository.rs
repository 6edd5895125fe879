use std::collections::BTreeMap;
use std::sync::Arc;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Text};
use rust_decimal::Decimal;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::utils::parse_decimal;
use septic_core::balance::{BalanceFilter, BalanceRepositoryTrait, TypeTotal};
use septic_core::utils::{money_add, round_money};
use septic_core::Result;

#[derive(QueryableByName, Debug)]
struct AmountRow {
    #[diesel(sql_type = Text)]
    kind: String,
    #[diesel(sql_type = Text)]
    amount: String,
}

/// Counts and sums amounts per type. Amounts are stored as decimal text and
/// are added as `Decimal`, never as floating point.
fn group_by_kind(rows: Vec<AmountRow>) -> Result<Vec<TypeTotal>> {
    let mut groups: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for row in rows {
        let amount = parse_decimal(&row.amount, "amount");
        let (count, total) = groups.entry(row.kind).or_insert((0, Decimal::ZERO));
        *count += 1;
        *total = money_add(*total, amount)?;
    }
    Ok(groups
        .into_iter()
        .map(|(kind, (count, total))| TypeTotal {
            kind,
            count,
            total: round_money(total),
        })
        .collect())
}

pub struct BalanceRepository {
    pool: Arc<DbPool>,
}

impl BalanceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn totals(&self, table: &str, type_column: &str, filter: &BalanceFilter) -> Result<Vec<TypeTotal>> {
        let mut conn = get_connection(&self.pool)?;

        // Each optional condition is always present and disabled by a NULL
        // bind, so the statement text stays fixed.
        let sql = format!(
            "SELECT {type_column} AS kind, amount \
             FROM {table} \
             WHERE (?1 IS NULL OR date >= ?1) \
               AND (?2 IS NULL OR date <= ?2) \
               AND (?3 IS NULL OR work_id = ?3) \
               AND (?4 IS NULL OR staff_id = ?4)"
        );

        let start = filter.start_date.map(|d| d.format("%Y-%m-%d").to_string());
        let end = filter.end_date.map(|d| d.format("%Y-%m-%d").to_string());

        let rows: Vec<AmountRow> = sql_query(sql)
            .bind::<Nullable<Text>, _>(start)
            .bind::<Nullable<Text>, _>(end)
            .bind::<Nullable<Text>, _>(filter.work_id.clone())
            .bind::<Nullable<Text>, _>(filter.staff_id.clone())
            .load(&mut conn)
            .into_core()?;
        group_by_kind(rows)
    }
}

impl BalanceRepositoryTrait for BalanceRepository {
    fn income_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>> {
        self.totals("incomes", "income_type", filter)
    }

    fn expense_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>> {
        self.totals("expenses", "expense_type", filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{ExpenseRepository, IncomeRepository};
    use crate::test_utils::test_db;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use septic_core::finance::{
        ExpenseRepositoryTrait, ExpenseType, IncomeRepositoryTrait, IncomeType, NewExpense,
        NewIncome,
    };

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn income(d: NaiveDate, amount: Decimal, income_type: IncomeType) -> NewIncome {
        NewIncome {
            date: d,
            amount,
            income_type,
            payment_method: None,
            notes: None,
            work_id: None,
            staff_id: None,
        }
    }

    #[tokio::test]
    async fn totals_are_grouped_by_type_within_the_range() {
        let db = test_db();
        let incomes = IncomeRepository::new(db.pool.clone(), db.writer.clone());
        let expenses = ExpenseRepository::new(db.pool.clone(), db.writer.clone());
        incomes
            .create(income(date(1, 10), dec!(3000), IncomeType::InitialPayment))
            .await
            .unwrap();
        incomes
            .create(income(date(2, 10), dec!(1999.99), IncomeType::FinalPayment))
            .await
            .unwrap();
        incomes
            .create(income(date(2, 20), dec!(0.01), IncomeType::FinalPayment))
            .await
            .unwrap();
        expenses
            .create(NewExpense {
                date: date(2, 11),
                amount: dec!(250.25),
                expense_type: ExpenseType::Fuel,
                payment_method: None,
                notes: None,
                work_id: None,
                staff_id: None,
                fixed_expense_id: None,
            })
            .await
            .unwrap();

        let repo = BalanceRepository::new(db.pool.clone());
        let february = BalanceFilter {
            start_date: Some(date(2, 1)),
            end_date: Some(date(2, 28)),
            ..Default::default()
        };

        let income_totals = repo.income_totals(&february).unwrap();
        assert_eq!(income_totals.len(), 1);
        assert_eq!(income_totals[0].kind, "FINAL_PAYMENT");
        assert_eq!(income_totals[0].count, 2);
        assert_eq!(income_totals[0].total, dec!(2000));

        let expense_totals = repo.expense_totals(&february).unwrap();
        assert_eq!(expense_totals[0].kind, "FUEL");
        assert_eq!(expense_totals[0].total, dec!(250.25));

        let everything = repo.income_totals(&BalanceFilter::default()).unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn large_amounts_are_summed_without_float_rounding() {
        let db = test_db();
        let incomes = IncomeRepository::new(db.pool.clone(), db.writer.clone());
        for amount in [dec!(12345678901234.57), dec!(0.01), dec!(0.01)] {
            incomes
                .create(income(date(3, 1), amount, IncomeType::Other))
                .await
                .unwrap();
        }

        let repo = BalanceRepository::new(db.pool.clone());
        let totals = repo.income_totals(&BalanceFilter::default()).unwrap();
        assert_eq!(totals[0].count, 3);
        assert_eq!(totals[0].total, dec!(12345678901234.59));
    }
}

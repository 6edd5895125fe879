use super::*;
use crate::errors::{Error, Result};
use crate::finance::{Expense, ExpenseType};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct MockFixedExpenseRepository {
    fixed: RwLock<Vec<FixedExpense>>,
    expenses: RwLock<Vec<Expense>>,
}

#[async_trait]
impl FixedExpenseRepositoryTrait for MockFixedExpenseRepository {
    async fn create(&self, fixed: NewFixedExpense) -> Result<FixedExpense> {
        let now = Utc::now().naive_utc();
        let mut all = self.fixed.write().unwrap();
        let created = FixedExpense {
            id: format!("fx-{}", all.len() + 1),
            name: fixed.name,
            amount: fixed.amount,
            expense_type: fixed.expense_type,
            frequency: fixed.frequency,
            next_due_date: fixed.next_due_date,
            anchor_date: fixed.next_due_date,
            periods_generated: 0,
            is_active: fixed.is_active,
            payment_method: fixed.payment_method,
            notes: fixed.notes,
            created_at: now,
            updated_at: now,
        };
        all.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _id: &str, _fixed: NewFixedExpense) -> Result<FixedExpense> {
        unimplemented!()
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut all = self.fixed.write().unwrap();
        let before = all.len();
        all.retain(|f| f.id != id);
        Ok(before - all.len())
    }

    fn get_by_id(&self, id: &str) -> Result<FixedExpense> {
        self.fixed
            .read()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Fixed expense", id))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<FixedExpense>> {
        Ok(self
            .fixed
            .read()
            .unwrap()
            .iter()
            .filter(|f| is_active_filter.map_or(true, |a| f.is_active == a))
            .cloned()
            .collect())
    }

    fn list_due(&self, today: NaiveDate) -> Result<Vec<FixedExpense>> {
        Ok(self
            .fixed
            .read()
            .unwrap()
            .iter()
            .filter(|f| f.is_active && f.next_due_date <= today)
            .cloned()
            .collect())
    }

    async fn record_generated(&self, run: GeneratedPeriods) -> Result<Vec<Expense>> {
        let mut all = self.fixed.write().unwrap();
        let fixed = all
            .iter_mut()
            .find(|f| f.id == run.fixed_expense_id)
            .ok_or_else(|| Error::not_found("Fixed expense", &run.fixed_expense_id))?;
        if fixed.next_due_date != run.planned_from {
            return Ok(Vec::new());
        }
        fixed.next_due_date = run.next_due_date;
        fixed.periods_generated = run.periods_generated;

        let mut stored = self.expenses.write().unwrap();
        let mut created = Vec::new();
        for e in run.expenses {
            let expense = Expense {
                id: format!("exp-{}", stored.len() + 1),
                date: e.date,
                amount: e.amount,
                expense_type: e.expense_type,
                payment_method: e.payment_method,
                notes: e.notes,
                work_id: e.work_id,
                staff_id: e.staff_id,
                fixed_expense_id: e.fixed_expense_id,
                created_at: Utc::now().naive_utc(),
            };
            stored.push(expense.clone());
            created.push(expense);
        }
        Ok(created)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent(next_due_date: NaiveDate, frequency: Frequency) -> NewFixedExpense {
    NewFixedExpense {
        name: "Yard rent".to_string(),
        amount: dec!(1200),
        expense_type: ExpenseType::Fixed,
        frequency,
        next_due_date,
        is_active: true,
        payment_method: Some("transfer".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn generates_one_expense_per_elapsed_period() {
    let repo = Arc::new(MockFixedExpenseRepository::default());
    let service = FixedExpenseService::new(repo.clone());
    let fixed = service
        .create_fixed_expense(rent(date(2025, 1, 31), Frequency::Monthly))
        .await
        .unwrap();

    let generated = service.generate_due(date(2025, 4, 15)).await.unwrap();
    let dates: Vec<_> = generated.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
    assert!(generated
        .iter()
        .all(|e| e.expense_type == ExpenseType::Fixed
            && e.fixed_expense_id.as_deref() == Some(fixed.id.as_str())
            && e.notes.as_deref() == Some("Yard rent")));

    let advanced = service.get_fixed_expense(&fixed.id).unwrap();
    assert_eq!(advanced.next_due_date, date(2025, 4, 30));
}

#[tokio::test]
async fn second_run_on_same_day_generates_nothing() {
    let service = FixedExpenseService::new(Arc::new(MockFixedExpenseRepository::default()));
    service
        .create_fixed_expense(rent(date(2025, 6, 2), Frequency::Weekly))
        .await
        .unwrap();

    assert_eq!(service.generate_due(date(2025, 6, 16)).await.unwrap().len(), 3);
    assert!(service.generate_due(date(2025, 6, 16)).await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_and_future_expenses_are_skipped() {
    let service = FixedExpenseService::new(Arc::new(MockFixedExpenseRepository::default()));
    let mut inactive = rent(date(2025, 1, 1), Frequency::Monthly);
    inactive.is_active = false;
    service.create_fixed_expense(inactive).await.unwrap();
    service
        .create_fixed_expense(rent(date(2025, 12, 1), Frequency::Yearly))
        .await
        .unwrap();

    assert!(service.generate_due(date(2025, 6, 1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejects_zero_amount() {
    let service = FixedExpenseService::new(Arc::new(MockFixedExpenseRepository::default()));
    let mut fixed = rent(date(2025, 1, 1), Frequency::Monthly);
    fixed.amount = dec!(0);
    assert!(matches!(
        service.create_fixed_expense(fixed).await.unwrap_err(),
        Error::Validation(_)
    ));
}

#[tokio::test]
async fn daily_runs_keep_the_month_end_schedule() {
    let service = FixedExpenseService::new(Arc::new(MockFixedExpenseRepository::default()));
    service
        .create_fixed_expense(rent(date(2025, 1, 31), Frequency::Monthly))
        .await
        .unwrap();

    let mut dates = Vec::new();
    let mut day = date(2025, 1, 31);
    while day <= date(2025, 4, 30) {
        dates.extend(service.generate_due(day).await.unwrap().iter().map(|e| e.date));
        day = day.succ_opt().unwrap();
    }

    assert_eq!(
        dates,
        vec![
            date(2025, 1, 31),
            date(2025, 2, 28),
            date(2025, 3, 31),
            date(2025, 4, 30)
        ]
    );
}

#[tokio::test]
async fn stale_run_writes_nothing() {
    let repo = Arc::new(MockFixedExpenseRepository::default());
    let service = FixedExpenseService::new(repo.clone());
    let fixed = service
        .create_fixed_expense(rent(date(2025, 1, 10), Frequency::Monthly))
        .await
        .unwrap();
    let stale = fixed.periods_due(date(2025, 1, 15), 10);

    assert_eq!(service.generate_due(date(2025, 1, 15)).await.unwrap().len(), 1);
    assert!(repo.record_generated(stale).await.unwrap().is_empty());
    assert_eq!(repo.expenses.read().unwrap().len(), 1);
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{BudgetItemChangeset, BudgetItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::budget_items;
use crate::utils::decimal_to_text;
use septic_core::budget_items::{
    BudgetItem, BudgetItemFilter, BudgetItemRepositoryTrait, NewBudgetItem,
};
use septic_core::Result;

pub struct BudgetItemRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetItemRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetItemRepositoryTrait for BudgetItemRepository {
    async fn create(&self, item: NewBudgetItem) -> Result<BudgetItem> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetItem> {
                let now = Utc::now().naive_utc();
                let row = BudgetItemDB {
                    id: Uuid::new_v4().to_string(),
                    name: item.name,
                    category: item.category,
                    brand: item.brand,
                    capacity: item.capacity,
                    description: item.description,
                    unit_price: decimal_to_text(item.unit_price),
                    unit: item.unit,
                    supplier_name: item.supplier_name,
                    supplier_location: item.supplier_location,
                    is_active: item.is_active,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(budget_items::table)
                    .values(&row)
                    .returning(BudgetItemDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(BudgetItem::from)
            })
            .await
    }

    async fn update(&self, id: &str, item: NewBudgetItem) -> Result<BudgetItem> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetItem> {
                let changes = BudgetItemChangeset {
                    name: item.name,
                    category: item.category,
                    brand: item.brand,
                    capacity: item.capacity,
                    description: item.description,
                    unit_price: decimal_to_text(item.unit_price),
                    unit: item.unit,
                    supplier_name: item.supplier_name,
                    supplier_location: item.supplier_location,
                    is_active: item.is_active,
                    updated_at: Utc::now().naive_utc(),
                };
                diesel::update(budget_items::table.find(&id))
                    .set(&changes)
                    .returning(BudgetItemDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Budget item", &id)
                    .map(BudgetItem::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(budget_items::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<BudgetItem> {
        let mut conn = get_connection(&self.pool)?;
        budget_items::table
            .find(id)
            .select(BudgetItemDB::as_select())
            .first(&mut conn)
            .or_not_found("Budget item", id)
            .map(BudgetItem::from)
    }

    fn list(&self, filter: &BudgetItemFilter) -> Result<Vec<BudgetItem>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = budget_items::table.into_boxed();
        if let Some(active) = filter.active {
            query = query.filter(budget_items::is_active.eq(active));
        }
        if let Some(category) = filter.category.as_deref().filter(|c| !c.trim().is_empty()) {
            query = query.filter(budget_items::category.eq(category.trim().to_string()));
        }
        let rows = query
            .order((budget_items::category.asc(), budget_items::name.asc()))
            .select(BudgetItemDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(BudgetItem::from).collect())
    }

    fn list_categories(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        budget_items::table
            .select(budget_items::category)
            .distinct()
            .order(budget_items::category.asc())
            .load::<String>(&mut conn)
            .into_core()
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::{exists, select};
use diesel::prelude::*;

use super::model::ReceiptDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{budgets, expenses, final_invoices, incomes, receipts};
use crate::utils::chunk_for_sqlite;
use septic_core::receipts::{NewReceipt, Receipt, ReceiptOwner, ReceiptRepositoryTrait};
use septic_core::Result;

pub struct ReceiptRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ReceiptRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ReceiptRepositoryTrait for ReceiptRepository {
    async fn create(&self, receipt: NewReceipt) -> Result<Receipt> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Receipt> {
                diesel::insert_into(receipts::table)
                    .values(&ReceiptDB::from_new(receipt, Utc::now().naive_utc()))
                    .returning(ReceiptDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Receipt::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(receipts::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        let owner_id = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Receipt>> {
                let removed = diesel::delete(
                    receipts::table
                        .filter(receipts::related_model.eq(owner.as_str()))
                        .filter(receipts::related_id.eq(&owner_id)),
                )
                .returning(ReceiptDB::as_returning())
                .get_results(conn)
                .into_core()?;
                Ok(removed.into_iter().map(Receipt::from).collect())
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Receipt> {
        let mut conn = get_connection(&self.pool)?;
        receipts::table
            .find(id)
            .select(ReceiptDB::as_select())
            .first(&mut conn)
            .or_not_found("Receipt", id)
            .map(Receipt::from)
    }

    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = receipts::table
            .filter(receipts::related_model.eq(owner.as_str()))
            .filter(receipts::related_id.eq(owner_id))
            .order(receipts::created_at.asc())
            .select(ReceiptDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    fn list_for_many(&self, owner: ReceiptOwner, owner_ids: &[String]) -> Result<Vec<Receipt>> {
        let mut conn = get_connection(&self.pool)?;
        let mut all = Vec::new();
        for chunk in chunk_for_sqlite(owner_ids) {
            let rows = receipts::table
                .filter(receipts::related_model.eq(owner.as_str()))
                .filter(receipts::related_id.eq_any(chunk))
                .order(receipts::created_at.asc())
                .select(ReceiptDB::as_select())
                .load(&mut conn)
                .into_core()?;
            all.extend(rows.into_iter().map(Receipt::from));
        }
        Ok(all)
    }

    fn owner_exists(&self, owner: ReceiptOwner, owner_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let query = match owner {
            ReceiptOwner::Income => {
                select(exists(incomes::table.find(owner_id))).get_result(&mut conn)
            }
            ReceiptOwner::Expense => {
                select(exists(expenses::table.find(owner_id))).get_result(&mut conn)
            }
            ReceiptOwner::Budget => {
                select(exists(budgets::table.find(owner_id))).get_result(&mut conn)
            }
            ReceiptOwner::FinalInvoice => {
                select(exists(final_invoices::table.find(owner_id))).get_result(&mut conn)
            }
        };
        query.into_core()
    }
}

//! In-memory repositories shared by service tests that span several modules.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::balance::{BalanceFilter, BalanceRepositoryTrait, TypeTotal};
use crate::budget_items::{BudgetItem, BudgetItemFilter, BudgetItemRepositoryTrait, NewBudgetItem};
use crate::budgets::{
    Budget, BudgetFilter, BudgetLineItem, BudgetRepositoryTrait, BudgetStatus,
    InitialPaymentResult, NewBudget, NewInitialPayment,
};
use crate::errors::{Error, Result};
use crate::final_invoices::{
    FinalInvoice, FinalInvoiceChanges, FinalInvoiceExtraItem, FinalInvoiceRepositoryTrait,
    FinalInvoiceStatus, FinalInvoiceUpdate, FinalPaymentResult, NewFinalInvoice,
    NewFinalInvoiceExtraItem, NewFinalPayment,
};
use crate::finance::{
    Expense, ExpenseFilter, ExpenseRepositoryTrait, Income, IncomeFilter, IncomeRepositoryTrait,
    NewExpense, NewIncome,
};
use crate::materials::{Material, MaterialRepositoryTrait, NewMaterial};
use crate::permits::{Permit, PermitInput, PermitRepositoryTrait};
use crate::receipts::{NewReceipt, Receipt, ReceiptOwner, ReceiptRepositoryTrait, ReceiptService};
use crate::utils::FileStore;
use crate::works::{NewWork, Work, WorkFilter, WorkRepositoryTrait, WorkStatus, WorkUpdate};

#[derive(Default)]
pub struct State {
    next_id: u32,
    pub catalog: Vec<BudgetItem>,
    pub permits: Vec<Permit>,
    pub budgets: Vec<Budget>,
    pub works: Vec<Work>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub materials: Vec<Material>,
    pub invoices: Vec<FinalInvoice>,
    pub receipts: Vec<Receipt>,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    pub state: Mutex<State>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A receipt service over this store, writing files into `root`.
    pub fn receipt_service(self: &Arc<Self>, root: &std::path::Path) -> Arc<ReceiptService> {
        Arc::new(ReceiptService::new(
            self.clone(),
            Arc::new(FileStore::new(root)),
        ))
    }

    pub fn add_catalog_item(&self, name: &str, category: &str, unit_price: Decimal) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.id("item");
        state.catalog.push(BudgetItem {
            id: id.clone(),
            name: name.to_string(),
            category: category.to_string(),
            brand: None,
            capacity: None,
            description: Some(format!("{} (catalog)", name)),
            unit_price,
            unit: None,
            supplier_name: None,
            supplier_location: None,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn add_permit(&self, permit_number: &str, property_address: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.id("permit");
        state.permits.push(Permit {
            id: id.clone(),
            permit_number: permit_number.to_string(),
            property_address: property_address.to_string(),
            applicant_name: None,
            applicant_email: None,
            applicant_phone: None,
            system_type: None,
            lot: None,
            block: None,
            construction_permit_for: None,
            excavation_required: None,
            drainfield_depth: None,
            gpd_capacity: None,
            pump: None,
            expiration_date: None,
            is_pbts: false,
            notes: None,
            pdf_file: None,
            created_at: now(),
            updated_at: now(),
        });
        id
    }

    pub fn set_work_status(&self, work_id: &str, status: WorkStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(work) = state.works.iter_mut().find(|w| w.id == work_id) {
            work.status = status;
        }
    }
}

fn insert_income(state: &mut State, income: NewIncome) -> Income {
    let created = Income {
        id: state.id("inc"),
        date: income.date,
        amount: income.amount,
        income_type: income.income_type,
        payment_method: income.payment_method,
        notes: income.notes,
        work_id: income.work_id,
        staff_id: income.staff_id,
        created_at: now(),
    };
    state.incomes.push(created.clone());
    created
}

fn insert_work(state: &mut State, work: NewWork) -> Work {
    let created = Work {
        id: state.id("work"),
        budget_id: work.budget_id,
        property_address: work.property_address,
        status: work.status,
        staff_id: work.staff_id,
        start_date: work.start_date,
        notes: work.notes,
        created_at: now(),
        updated_at: now(),
    };
    state.works.push(created.clone());
    created
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

fn matches(value: &Option<String>, wanted: &Option<String>) -> bool {
    wanted.as_ref().map_or(true, |w| value.as_ref() == Some(w))
}

fn store_budget(state: &mut State, id: String, budget: NewBudget, created_at: NaiveDateTime) -> Budget {
    let mut line_items = Vec::new();
    for line in budget.line_items {
        line_items.push(BudgetLineItem {
            id: state.id("line"),
            budget_id: id.clone(),
            budget_item_id: line.budget_item_id,
            name: line.name,
            category: line.category,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
            notes: line.notes,
        });
    }
    let stored = Budget {
        id: id.clone(),
        permit_id: budget.permit_id,
        property_address: budget.property_address,
        applicant_name: budget.applicant_name,
        date: budget.date,
        expiration_date: budget.expiration_date,
        status: budget.status,
        discount_description: budget.discount_description,
        discount_amount: budget.discount_amount,
        initial_payment_percentage: budget.initial_payment_percentage,
        subtotal: budget.subtotal,
        total: budget.total,
        initial_payment: budget.initial_payment,
        general_notes: budget.general_notes,
        line_items,
        created_at,
        updated_at: now(),
    };
    state.budgets.retain(|b| b.id != id);
    state.budgets.push(stored.clone());
    stored
}

#[async_trait]
impl BudgetItemRepositoryTrait for InMemoryStore {
    async fn create(&self, _item: NewBudgetItem) -> Result<BudgetItem> {
        unimplemented!()
    }
    async fn update(&self, _id: &str, _item: NewBudgetItem) -> Result<BudgetItem> {
        unimplemented!()
    }
    async fn delete(&self, _id: &str) -> Result<usize> {
        unimplemented!()
    }
    fn get_by_id(&self, id: &str) -> Result<BudgetItem> {
        let state = self.state.lock().unwrap();
        state
            .catalog
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Budget item", id))
    }
    fn list(&self, _filter: &BudgetItemFilter) -> Result<Vec<BudgetItem>> {
        Ok(self.state.lock().unwrap().catalog.clone())
    }
    fn list_categories(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PermitRepositoryTrait for InMemoryStore {
    async fn create(&self, _input: PermitInput) -> Result<Permit> {
        unimplemented!()
    }
    async fn update(&self, _id: &str, _input: PermitInput) -> Result<Permit> {
        unimplemented!()
    }
    async fn set_pdf_file(&self, _id: &str, _file_name: String) -> Result<Permit> {
        unimplemented!()
    }
    async fn delete(&self, _id: &str) -> Result<usize> {
        unimplemented!()
    }
    fn get_by_id(&self, id: &str) -> Result<Permit> {
        let state = self.state.lock().unwrap();
        state
            .permits
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Permit", id))
    }
    fn find_by_permit_number(&self, permit_number: &str) -> Result<Option<Permit>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .permits
            .iter()
            .find(|p| p.permit_number == permit_number)
            .cloned())
    }
    fn find_by_address(&self, property_address: &str) -> Result<Option<Permit>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .permits
            .iter()
            .find(|p| p.property_address.eq_ignore_ascii_case(property_address))
            .cloned())
    }
    fn list(&self, _search: Option<&str>) -> Result<Vec<Permit>> {
        Ok(self.state.lock().unwrap().permits.clone())
    }
}

#[async_trait]
impl BudgetRepositoryTrait for InMemoryStore {
    async fn create(&self, budget: NewBudget) -> Result<Budget> {
        let mut state = self.state.lock().unwrap();
        let id = state.id("budget");
        Ok(store_budget(&mut state, id, budget, now()))
    }

    async fn update(&self, id: &str, budget: NewBudget) -> Result<Budget> {
        let mut state = self.state.lock().unwrap();
        let (created_at, status) = state
            .budgets
            .iter()
            .find(|b| b.id == id)
            .map(|b| (b.created_at, b.status))
            .ok_or_else(|| Error::not_found("Budget", id))?;
        status.ensure_editable()?;
        Ok(store_budget(&mut state, id.to_string(), budget, created_at))
    }

    async fn update_status(&self, id: &str, status: BudgetStatus) -> Result<Budget> {
        let mut state = self.state.lock().unwrap();
        let budget = state
            .budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::not_found("Budget", id))?;
        budget.status.ensure_transition(status)?;
        budget.status = status;
        Ok(budget.clone())
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.budgets.len();
        state.budgets.retain(|b| b.id != id);
        for work in state.works.iter_mut().filter(|w| w.budget_id.as_deref() == Some(id)) {
            work.budget_id = None;
        }
        Ok(before - state.budgets.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Budget> {
        let state = self.state.lock().unwrap();
        state
            .budgets
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Budget", id))
    }

    fn list(&self, filter: &BudgetFilter) -> Result<Vec<Budget>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .budgets
            .iter()
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .cloned()
            .collect())
    }

    async fn record_initial_payment(
        &self,
        payment: NewInitialPayment,
    ) -> Result<InitialPaymentResult> {
        let mut state = self.state.lock().unwrap();
        let budget = {
            let budget = state
                .budgets
                .iter_mut()
                .find(|b| b.id == payment.budget_id)
                .ok_or_else(|| Error::not_found("Budget", &payment.budget_id))?;
            budget.status.ensure_payable()?;
            budget.status = BudgetStatus::Paid;
            budget.clone()
        };
        let work = insert_work(&mut state, payment.work);
        let income = insert_income(
            &mut state,
            NewIncome {
                date: payment.payment_date,
                amount: payment.amount,
                income_type: crate::finance::IncomeType::InitialPayment,
                payment_method: payment.payment_method,
                notes: payment.notes,
                work_id: Some(work.id.clone()),
                staff_id: payment.staff_id,
            },
        );
        Ok(InitialPaymentResult {
            budget,
            work,
            income,
        })
    }
}

#[async_trait]
impl WorkRepositoryTrait for InMemoryStore {
    async fn create(&self, work: NewWork) -> Result<Work> {
        let mut state = self.state.lock().unwrap();
        Ok(insert_work(&mut state, work))
    }

    async fn update(&self, id: &str, update: WorkUpdate, status: WorkStatus) -> Result<Work> {
        let mut state = self.state.lock().unwrap();
        let work = state
            .works
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::not_found("Work", id))?;
        work.staff_id = update.staff_id;
        work.start_date = update.start_date;
        work.notes = update.notes;
        work.status = status;
        Ok(work.clone())
    }

    async fn update_status(&self, id: &str, status: WorkStatus) -> Result<Work> {
        let mut state = self.state.lock().unwrap();
        let work = state
            .works
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::not_found("Work", id))?;
        work.status = status;
        Ok(work.clone())
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.works.len();
        state.works.retain(|w| w.id != id);
        state.materials.retain(|m| m.work_id != id);
        state.invoices.retain(|i| i.work_id != id);
        Ok(before - state.works.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Work> {
        let state = self.state.lock().unwrap();
        state
            .works
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Work", id))
    }

    fn find_by_budget(&self, budget_id: &str) -> Result<Option<Work>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .works
            .iter()
            .find(|w| w.budget_id.as_deref() == Some(budget_id))
            .cloned())
    }

    fn list(&self, filter: &WorkFilter) -> Result<Vec<Work>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .works
            .iter()
            .filter(|w| filter.status.map_or(true, |s| w.status == s))
            .filter(|w| matches(&w.staff_id, &filter.staff_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IncomeRepositoryTrait for InMemoryStore {
    async fn create(&self, income: NewIncome) -> Result<Income> {
        let mut state = self.state.lock().unwrap();
        Ok(insert_income(&mut state, income))
    }

    async fn update(&self, _id: &str, _income: NewIncome) -> Result<Income> {
        unimplemented!()
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.incomes.len();
        state.incomes.retain(|i| i.id != id);
        Ok(before - state.incomes.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Income> {
        let state = self.state.lock().unwrap();
        state
            .incomes
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Income", id))
    }

    fn list(&self, filter: &IncomeFilter) -> Result<Vec<Income>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .incomes
            .iter()
            .filter(|i| in_range(i.date, filter.start_date, filter.end_date))
            .filter(|i| filter.income_type.map_or(true, |t| i.income_type == t))
            .filter(|i| matches(&i.work_id, &filter.work_id))
            .filter(|i| matches(&i.staff_id, &filter.staff_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for InMemoryStore {
    async fn create(&self, expense: NewExpense) -> Result<Expense> {
        let mut state = self.state.lock().unwrap();
        let created = Expense {
            id: state.id("exp"),
            date: expense.date,
            amount: expense.amount,
            expense_type: expense.expense_type,
            payment_method: expense.payment_method,
            notes: expense.notes,
            work_id: expense.work_id,
            staff_id: expense.staff_id,
            fixed_expense_id: expense.fixed_expense_id,
            created_at: now(),
        };
        state.expenses.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _id: &str, _expense: NewExpense) -> Result<Expense> {
        unimplemented!()
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.expenses.len();
        state.expenses.retain(|e| e.id != id);
        Ok(before - state.expenses.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Expense> {
        let state = self.state.lock().unwrap();
        state
            .expenses
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Expense", id))
    }

    fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .expenses
            .iter()
            .filter(|e| in_range(e.date, filter.start_date, filter.end_date))
            .filter(|e| filter.expense_type.map_or(true, |t| e.expense_type == t))
            .filter(|e| matches(&e.work_id, &filter.work_id))
            .filter(|e| matches(&e.staff_id, &filter.staff_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MaterialRepositoryTrait for InMemoryStore {
    async fn create(&self, work_id: &str, material: NewMaterial) -> Result<Material> {
        let mut state = self.state.lock().unwrap();
        let created = Material {
            id: state.id("mat"),
            work_id: work_id.to_string(),
            name: material.name,
            quantity: material.quantity,
            unit: material.unit,
            comment: material.comment,
            purchase_date: material.purchase_date,
            created_at: now(),
        };
        state.materials.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _id: &str, _material: NewMaterial) -> Result<Material> {
        unimplemented!()
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.materials.len();
        state.materials.retain(|m| m.id != id);
        Ok(before - state.materials.len())
    }

    fn get_by_id(&self, id: &str) -> Result<Material> {
        let state = self.state.lock().unwrap();
        state
            .materials
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Material", id))
    }

    fn list_for_work(&self, work_id: &str) -> Result<Vec<Material>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .materials
            .iter()
            .filter(|m| m.work_id == work_id)
            .cloned()
            .collect())
    }
}

fn apply_changes(invoice: &mut FinalInvoice, changes: FinalInvoiceChanges) {
    invoice.invoice_date = changes.invoice_date;
    invoice.discount = changes.discount;
    invoice.notes = changes.notes;
    invoice.subtotal_extras = changes.subtotal_extras;
    invoice.final_amount_due = changes.final_amount_due;
    invoice.status = changes.status;
    invoice.updated_at = now();
}

fn invoice_mut<'a>(state: &'a mut State, id: &str) -> Result<&'a mut FinalInvoice> {
    state
        .invoices
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| Error::not_found("Final invoice", id))
}

fn advance_work(state: &mut State, invoice: &FinalInvoice) {
    let target = match invoice.status {
        FinalInvoiceStatus::Paid => WorkStatus::PaymentReceived,
        _ => WorkStatus::InvoiceFinal,
    };
    if let Some(work) = state.works.iter_mut().find(|w| w.id == invoice.work_id) {
        if let Some(next) = work.status.advanced_to(target) {
            work.status = next;
        }
    }
}

#[async_trait]
impl FinalInvoiceRepositoryTrait for InMemoryStore {
    async fn create(&self, invoice: NewFinalInvoice) -> Result<FinalInvoice> {
        let mut state = self.state.lock().unwrap();
        if state.invoices.iter().any(|i| i.work_id == invoice.work_id) {
            return Err(Error::ConstraintViolation(format!(
                "Work '{}' already has a final invoice",
                invoice.work_id
            )));
        }
        let created = FinalInvoice {
            id: state.id("inv"),
            work_id: invoice.work_id.clone(),
            budget_id: invoice.budget_id,
            invoice_date: invoice.invoice_date,
            original_budget_total: invoice.original_budget_total,
            initial_payment_made: invoice.initial_payment_made,
            extra_items: Vec::new(),
            subtotal_extras: invoice.subtotal_extras,
            discount: invoice.discount,
            final_amount_due: invoice.final_amount_due,
            amount_paid: Decimal::ZERO,
            status: invoice.status,
            payment_date: None,
            payment_notes: None,
            notes: invoice.notes,
            created_at: now(),
            updated_at: now(),
        };
        state.invoices.push(created.clone());
        advance_work(&mut state, &created);
        Ok(created)
    }

    async fn update(&self, id: &str, update: FinalInvoiceUpdate) -> Result<FinalInvoice> {
        let mut state = self.state.lock().unwrap();
        let invoice = invoice_mut(&mut state, id)?;
        let changes = invoice.edit(&update)?;
        apply_changes(invoice, changes);
        Ok(invoice.clone())
    }

    async fn cancel(&self, id: &str) -> Result<FinalInvoice> {
        let mut state = self.state.lock().unwrap();
        let invoice = invoice_mut(&mut state, id)?;
        let changes = invoice.cancellation()?;
        apply_changes(invoice, changes);
        Ok(invoice.clone())
    }

    async fn add_extra_item(
        &self,
        id: &str,
        item: NewFinalInvoiceExtraItem,
    ) -> Result<FinalInvoice> {
        let mut state = self.state.lock().unwrap();
        let item_id = state.id("extra");
        let invoice = invoice_mut(&mut state, id)?;
        let changes = invoice.with_extra_item(&item)?;
        invoice.extra_items.push(FinalInvoiceExtraItem {
            id: item_id,
            final_invoice_id: id.to_string(),
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        });
        apply_changes(invoice, changes);
        Ok(invoice.clone())
    }

    async fn remove_extra_item(&self, id: &str, item_id: &str) -> Result<FinalInvoice> {
        let mut state = self.state.lock().unwrap();
        let invoice = invoice_mut(&mut state, id)?;
        let changes = invoice.without_extra_item(item_id)?;
        invoice.extra_items.retain(|i| i.id != item_id);
        apply_changes(invoice, changes);
        Ok(invoice.clone())
    }

    async fn register_payment(
        &self,
        id: &str,
        payment: NewFinalPayment,
    ) -> Result<FinalPaymentResult> {
        let mut state = self.state.lock().unwrap();
        let invoice = {
            let invoice = invoice_mut(&mut state, id)?;
            let (amount_paid, status) = invoice.settle(payment.amount)?;
            invoice.amount_paid = amount_paid;
            invoice.status = status;
            invoice.payment_date = Some(payment.payment_date);
            invoice.payment_notes = payment.notes.clone();
            invoice.updated_at = now();
            invoice.clone()
        };
        let income = insert_income(&mut state, payment.income_for(&invoice.work_id));
        advance_work(&mut state, &invoice);
        Ok(FinalPaymentResult { invoice, income })
    }

    fn get_by_id(&self, id: &str) -> Result<FinalInvoice> {
        let state = self.state.lock().unwrap();
        state
            .invoices
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Final invoice", id))
    }

    fn get_for_work(&self, work_id: &str) -> Result<Option<FinalInvoice>> {
        let state = self.state.lock().unwrap();
        Ok(state.invoices.iter().find(|i| i.work_id == work_id).cloned())
    }
}

#[async_trait]
impl ReceiptRepositoryTrait for InMemoryStore {
    async fn create(&self, receipt: NewReceipt) -> Result<Receipt> {
        let mut state = self.state.lock().unwrap();
        let created = Receipt {
            id: state.id("rcpt"),
            related_model: receipt.related_model,
            related_id: receipt.related_id,
            file_name: receipt.file_name,
            mime_type: receipt.mime_type,
            size: receipt.size,
            sha256: receipt.sha256,
            stored_name: receipt.stored_name,
            notes: receipt.notes,
            created_at: now(),
        };
        state.receipts.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.receipts.len();
        state.receipts.retain(|r| r.id != id);
        Ok(before - state.receipts.len())
    }

    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        let mut state = self.state.lock().unwrap();
        let (removed, kept): (Vec<_>, Vec<_>) = state
            .receipts
            .drain(..)
            .partition(|r| r.related_model == owner && r.related_id == owner_id);
        state.receipts = kept;
        Ok(removed)
    }

    fn get_by_id(&self, id: &str) -> Result<Receipt> {
        let state = self.state.lock().unwrap();
        state
            .receipts
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Receipt", id))
    }

    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .receipts
            .iter()
            .filter(|r| r.related_model == owner && r.related_id == owner_id)
            .cloned()
            .collect())
    }

    fn list_for_many(&self, owner: ReceiptOwner, owner_ids: &[String]) -> Result<Vec<Receipt>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .receipts
            .iter()
            .filter(|r| r.related_model == owner && owner_ids.contains(&r.related_id))
            .cloned()
            .collect())
    }

    fn owner_exists(&self, owner: ReceiptOwner, owner_id: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(match owner {
            ReceiptOwner::Income => state.incomes.iter().any(|i| i.id == owner_id),
            ReceiptOwner::Expense => state.expenses.iter().any(|e| e.id == owner_id),
            ReceiptOwner::Budget => state.budgets.iter().any(|b| b.id == owner_id),
            ReceiptOwner::FinalInvoice => state.invoices.iter().any(|i| i.id == owner_id),
        })
    }
}

fn group_totals<'a>(rows: impl Iterator<Item = (&'a str, Decimal)>) -> Vec<TypeTotal> {
    let mut totals: Vec<TypeTotal> = Vec::new();
    for (kind, amount) in rows {
        match totals.iter_mut().find(|t| t.kind == kind) {
            Some(total) => {
                total.count += 1;
                total.total += amount;
            }
            None => totals.push(TypeTotal {
                kind: kind.to_string(),
                count: 1,
                total: amount,
            }),
        }
    }
    totals.sort_by(|a, b| a.kind.cmp(&b.kind));
    totals
}

impl BalanceRepositoryTrait for InMemoryStore {
    fn income_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>> {
        let incomes = IncomeRepositoryTrait::list(self, &filter.income_filter())?;
        Ok(group_totals(
            incomes.iter().map(|i| (i.income_type.as_str(), i.amount)),
        ))
    }

    fn expense_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>> {
        let expenses = ExpenseRepositoryTrait::list(self, &filter.expense_filter())?;
        Ok(group_totals(
            expenses.iter().map(|e| (e.expense_type.as_str(), e.amount)),
        ))
    }
}

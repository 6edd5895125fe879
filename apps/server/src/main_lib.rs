use std::sync::Arc;

use argon2::password_hash::PasswordHash;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{decode_secret_key, AuthManager},
    config::Config,
};
use septic_core::{
    balance::{BalanceService, BalanceServiceTrait},
    budget_items::{BudgetItemService, BudgetItemServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    final_invoices::{FinalInvoiceService, FinalInvoiceServiceTrait},
    finance::{FinanceService, FinanceServiceTrait},
    fixed_expenses::{FixedExpenseService, FixedExpenseServiceTrait},
    materials::{MaterialService, MaterialServiceTrait},
    permits::{PermitService, PermitServiceTrait},
    receipts::{ReceiptService, ReceiptServiceTrait},
    staff::{StaffService, StaffServiceTrait},
    system_types::{SystemTypeService, SystemTypeServiceTrait},
    utils::FileStore,
    works::{WorkService, WorkServiceTrait},
};
use septic_storage_sqlite::{
    balance::BalanceRepository, budget_items::BudgetItemRepository, budgets::BudgetRepository,
    db, final_invoices::FinalInvoiceRepository, finance::ExpenseRepository,
    finance::IncomeRepository, fixed_expenses::FixedExpenseRepository,
    materials::MaterialRepository, permits::PermitRepository, receipts::ReceiptRepository,
    staff::StaffRepository, system_types::SystemTypeRepository, works::WorkRepository,
};

pub struct AppState {
    pub staff_service: Arc<dyn StaffServiceTrait>,
    pub system_type_service: Arc<dyn SystemTypeServiceTrait>,
    pub budget_item_service: Arc<dyn BudgetItemServiceTrait>,
    pub permit_service: Arc<dyn PermitServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub work_service: Arc<dyn WorkServiceTrait>,
    pub material_service: Arc<dyn MaterialServiceTrait>,
    pub finance_service: Arc<dyn FinanceServiceTrait>,
    pub receipt_service: Arc<dyn ReceiptServiceTrait>,
    pub fixed_expense_service: Arc<dyn FixedExpenseServiceTrait>,
    pub final_invoice_service: Arc<dyn FinalInvoiceServiceTrait>,
    pub balance_service: Arc<dyn BalanceServiceTrait>,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SEPTIC_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let files = Arc::new(FileStore::new(&config.upload_dir));
    tracing::info!("Upload directory in use: {}", config.upload_dir);

    let staff_repo = Arc::new(StaffRepository::new(pool.clone(), writer.clone()));
    let system_type_repo = Arc::new(SystemTypeRepository::new(pool.clone(), writer.clone()));
    let budget_item_repo = Arc::new(BudgetItemRepository::new(pool.clone(), writer.clone()));
    let permit_repo = Arc::new(PermitRepository::new(pool.clone(), writer.clone()));
    let budget_repo = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let work_repo = Arc::new(WorkRepository::new(pool.clone(), writer.clone()));
    let material_repo = Arc::new(MaterialRepository::new(pool.clone(), writer.clone()));
    let income_repo = Arc::new(IncomeRepository::new(pool.clone(), writer.clone()));
    let expense_repo = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let receipt_repo = Arc::new(ReceiptRepository::new(pool.clone(), writer.clone()));
    let fixed_expense_repo = Arc::new(FixedExpenseRepository::new(pool.clone(), writer.clone()));
    let final_invoice_repo = Arc::new(FinalInvoiceRepository::new(pool.clone(), writer.clone()));
    let balance_repo = Arc::new(BalanceRepository::new(pool.clone()));

    let staff_service = Arc::new(StaffService::new(staff_repo));
    let receipt_service: Arc<dyn ReceiptServiceTrait> =
        Arc::new(ReceiptService::new(receipt_repo.clone(), files.clone()));

    let state = AppState {
        system_type_service: Arc::new(SystemTypeService::new(system_type_repo)),
        budget_item_service: Arc::new(BudgetItemService::new(budget_item_repo.clone())),
        permit_service: Arc::new(PermitService::new(permit_repo.clone(), files)),
        budget_service: Arc::new(BudgetService::new(
            budget_repo.clone(),
            budget_item_repo,
            permit_repo,
            receipt_service.clone(),
        )),
        work_service: Arc::new(WorkService::new(
            work_repo.clone(),
            budget_repo.clone(),
            material_repo.clone(),
            income_repo.clone(),
            expense_repo.clone(),
            final_invoice_repo.clone(),
            receipt_service.clone(),
        )),
        material_service: Arc::new(MaterialService::new(material_repo, work_repo.clone())),
        finance_service: Arc::new(FinanceService::new(
            income_repo.clone(),
            expense_repo.clone(),
            receipt_service.clone(),
        )),
        fixed_expense_service: Arc::new(FixedExpenseService::new(fixed_expense_repo)),
        final_invoice_service: Arc::new(FinalInvoiceService::new(
            final_invoice_repo,
            work_repo.clone(),
            budget_repo,
            income_repo.clone(),
        )),
        balance_service: Arc::new(BalanceService::new(
            balance_repo,
            income_repo,
            expense_repo,
            receipt_repo,
            work_repo,
        )),
        receipt_service,
        staff_service: staff_service.clone(),
        auth: build_auth(config)?,
    };

    seed_bootstrap_owner(config, staff_service.as_ref()).await?;

    Ok(Arc::new(state))
}

fn build_auth(config: &Config) -> anyhow::Result<Option<Arc<AuthManager>>> {
    match config.secret_key.as_deref() {
        Some(raw) => {
            let secret = decode_secret_key(raw)?;
            Ok(Some(Arc::new(AuthManager::new(&secret, config.token_ttl))))
        }
        None => {
            tracing::warn!("SEPTIC_SECRET_KEY is not set; authentication is disabled");
            Ok(None)
        }
    }
}

/// Creates the first Owner account from the bootstrap variables when the
/// staff table is empty.
async fn seed_bootstrap_owner(
    config: &Config,
    staff_service: &dyn StaffServiceTrait,
) -> anyhow::Result<()> {
    let (Some(email), Some(hash)) = (
        config.bootstrap_email.as_deref(),
        config.bootstrap_password_hash.as_deref(),
    ) else {
        return Ok(());
    };

    PasswordHash::new(hash).map_err(|e| {
        anyhow::anyhow!("SEPTIC_BOOTSTRAP_PASSWORD_HASH is not a valid PHC string: {e}")
    })?;

    if let Some(owner) = staff_service
        .ensure_bootstrap_owner(email, hash.to_string())
        .await?
    {
        tracing::info!(staff_id = %owner.id, email = %owner.email, "Bootstrap owner created");
    }
    Ok(())
}

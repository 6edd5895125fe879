use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use septic_core::final_invoices::{
    ExtraItemInput, FinalInvoice, FinalInvoiceUpdate, FinalPaymentInput, FinalPaymentResult,
};

use crate::{
    auth::{AuthUser, FINANCE},
    error::ApiResult,
    main_lib::AppState,
};

async fn generate_for_work(
    Path(work_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    let invoice = state
        .final_invoice_service
        .generate_for_work(&work_id)
        .await?;
    tracing::info!(invoice_id = %invoice.id, %work_id, "final invoice generated");
    Ok(Json(invoice))
}

async fn get_for_work(
    Path(work_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(state.final_invoice_service.get_for_work(&work_id)?))
}

async fn get_invoice(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(state.final_invoice_service.get_invoice(&id)?))
}

async fn update_invoice(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(update): Json<FinalInvoiceUpdate>,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .final_invoice_service
            .update_invoice(&id, update)
            .await?,
    ))
}

async fn cancel_invoice(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(state.final_invoice_service.cancel_invoice(&id).await?))
}

async fn add_extra_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(item): Json<ExtraItemInput>,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .final_invoice_service
            .add_extra_item(&id, item)
            .await?,
    ))
}

async fn remove_extra_item(
    Path((id, item_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<FinalInvoice>> {
    user.require(FINANCE)?;
    Ok(Json(
        state
            .final_invoice_service
            .remove_extra_item(&id, &item_id)
            .await?,
    ))
}

/// Books a payment against the invoice. Paying it in full closes the work.
#[utoipa::path(
    post,
    path = "/api/v1/final-invoices/{id}/payments",
    params(("id" = String, Path, description = "Final invoice id")),
    responses(
        (status = 200, description = "Updated invoice and the income created"),
        (status = 400, description = "Amount exceeds the balance due or invoice is cancelled")
    )
)]
pub async fn register_payment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payment): Json<FinalPaymentInput>,
) -> ApiResult<Json<FinalPaymentResult>> {
    user.require(FINANCE)?;
    let result = state
        .final_invoice_service
        .register_payment(&id, payment, user.staff_id.clone())
        .await?;
    tracing::info!(
        invoice_id = %id,
        status = %result.invoice.status,
        amount = %result.income.amount,
        "final payment registered"
    );
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/works/{id}/final-invoice",
            get(get_for_work).post(generate_for_work),
        )
        .route(
            "/final-invoices/{id}",
            get(get_invoice).put(update_invoice),
        )
        .route("/final-invoices/{id}/cancel", post(cancel_invoice))
        .route("/final-invoices/{id}/items", post(add_extra_item))
        .route(
            "/final-invoices/{id}/items/{item_id}",
            delete(remove_extra_item),
        )
        .route("/final-invoices/{id}/payments", post(register_payment))
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use septic_core::receipts::{Receipt, ReceiptOwner, ReceiptUpload};

use crate::{
    api::{file_response, UploadForm},
    auth::{AuthUser, FINANCE},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptQuery {
    related_model: String,
    related_id: String,
}

fn parse_owner(value: &str) -> ApiResult<ReceiptOwner> {
    Ok(value.parse::<ReceiptOwner>()?)
}

/// Multipart upload with `relatedModel`, `relatedId`, optional `notes` and the
/// file itself in `file`.
#[utoipa::path(
    post,
    path = "/api/v1/receipts",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "relatedModel, relatedId, notes and file"),
    responses(
        (status = 200, description = "Stored receipt"),
        (status = 400, description = "Unsupported file type or unknown owner"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_receipt(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<Receipt>> {
    user.require(FINANCE)?;
    let form = UploadForm::read(multipart).await?;
    let related_model = form
        .field("relatedModel")
        .ok_or_else(|| ApiError::BadRequest("relatedModel is required".to_string()))?;
    let related_id = form.field("relatedId").unwrap_or_default();
    let notes = form.field("notes");
    let (_, file) = form.require_file()?;

    let upload = ReceiptUpload {
        related_model: parse_owner(&related_model)?,
        related_id,
        mime_type: file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        file_name: file.file_name,
        notes,
        bytes: file.bytes,
    };
    let receipt = state.receipt_service.upload_receipt(upload).await?;
    tracing::info!(
        receipt_id = %receipt.id,
        owner = %receipt.related_model,
        owner_id = %receipt.related_id,
        size = receipt.size,
        "receipt uploaded"
    );
    Ok(Json(receipt))
}

async fn list_receipts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ReceiptQuery>,
) -> ApiResult<Json<Vec<Receipt>>> {
    user.require(FINANCE)?;
    let owner = parse_owner(&query.related_model)?;
    Ok(Json(
        state.receipt_service.list_for(owner, &query.related_id)?,
    ))
}

async fn download_receipt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    user.require(FINANCE)?;
    let (receipt, bytes) = state.receipt_service.read_file(&id).await?;
    Ok(file_response(bytes, &receipt.mime_type, &receipt.file_name))
}

async fn delete_receipt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FINANCE)?;
    state.receipt_service.delete_receipt(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/receipts", post(upload_receipt).get(list_receipts))
        .route("/receipts/{id}", delete(delete_receipt))
        .route("/receipts/{id}/file", get(download_receipt))
}

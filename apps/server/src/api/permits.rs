use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use septic_core::{
    constants::PERMIT_DOCUMENT_MIME_TYPE,
    permits::{ExtractedPermitFields, Permit, PermitCheck, PermitInput},
};

use crate::{
    api::{file_response, UploadForm},
    auth::{AuthUser, FRONT_OFFICE},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
pub struct PermitSearch {
    search: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitCheckQuery {
    permit_number: Option<String>,
    property_address: Option<String>,
}

#[derive(Deserialize)]
pub struct ExtractTextRequest {
    text: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/permits",
    params(("search" = Option<String>, Query, description = "Substring of number, address or applicant")),
    responses((status = 200, description = "Permits, newest first"))
)]
pub async fn list_permits(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PermitSearch>,
) -> ApiResult<Json<Vec<Permit>>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.list_permits(query.search)?))
}

async fn check_permit(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PermitCheckQuery>,
) -> ApiResult<Json<PermitCheck>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.check_permit(
        query.permit_number,
        query.property_address,
    )?))
}

async fn get_permit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Permit>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.get_permit(&id)?))
}

async fn create_permit(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<PermitInput>,
) -> ApiResult<Json<Permit>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.create_permit(input).await?))
}

async fn update_permit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(input): Json<PermitInput>,
) -> ApiResult<Json<Permit>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.update_permit(&id, input).await?))
}

async fn delete_permit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(FRONT_OFFICE)?;
    state.permit_service.delete_permit(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_pdf(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<Permit>> {
    user.require(FRONT_OFFICE)?;
    let (_, file) = UploadForm::read(multipart).await?.require_file()?;
    Ok(Json(state.permit_service.attach_pdf(&id, file.bytes).await?))
}

async fn download_pdf(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    user.require(FRONT_OFFICE)?;
    let permit = state.permit_service.get_permit(&id)?;
    let bytes = state.permit_service.read_pdf(&id).await?;
    let file_name = format!("permit-{}.pdf", permit.permit_number);
    Ok(file_response(bytes, PERMIT_DOCUMENT_MIME_TYPE, &file_name))
}

/// Reads a permit PDF and returns the fields found in it. Nothing is stored.
#[utoipa::path(
    post,
    path = "/api/v1/permits/extract",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "PDF in the `file` field"),
    responses(
        (status = 200, description = "Fields recovered from the document"),
        (status = 400, description = "Not a readable PDF")
    )
)]
pub async fn extract_permit(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<ExtractedPermitFields>> {
    user.require(FRONT_OFFICE)?;
    let (_, file) = UploadForm::read(multipart).await?.require_file()?;
    let service = state.permit_service.clone();
    let fields = tokio::task::spawn_blocking(move || service.extract_from_pdf(&file.bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("PDF extraction task failed: {e}")))??;
    Ok(Json(fields))
}

async fn extract_permit_text(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<ExtractTextRequest>,
) -> ApiResult<Json<ExtractedPermitFields>> {
    user.require(FRONT_OFFICE)?;
    Ok(Json(state.permit_service.extract_from_text(&payload.text)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/permits", get(list_permits).post(create_permit))
        .route("/permits/check", get(check_permit))
        .route("/permits/extract", post(extract_permit))
        .route("/permits/extract-text", post(extract_permit_text))
        .route(
            "/permits/{id}",
            get(get_permit).put(update_permit).delete(delete_permit),
        )
        .route("/permits/{id}/pdf", get(download_pdf).post(upload_pdf))
}

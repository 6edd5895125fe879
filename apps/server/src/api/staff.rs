use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use septic_core::staff::{NewStaff, Staff, StaffUpdate};

use crate::{
    auth::{hash_password, AuthUser, STAFF_ADMIN},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffQuery {
    is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    #[serde(flatten)]
    staff: NewStaff,
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordRequest {
    password: String,
}

#[utoipa::path(get, path = "/api/v1/staff", responses((status = 200, description = "Staff members")))]
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<StaffQuery>,
) -> ApiResult<Json<Vec<Staff>>> {
    user.require(STAFF_ADMIN)?;
    Ok(Json(state.staff_service.list_staff(query.is_active)?))
}

/// The plain password, when given, is hashed here; a client-supplied hash is
/// never stored.
#[utoipa::path(post, path = "/api/v1/staff", responses((status = 200, description = "Created staff member"), (status = 400, description = "Invalid input or duplicate email")))]
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateStaffRequest>,
) -> ApiResult<Json<Staff>> {
    user.require(STAFF_ADMIN)?;
    let mut new_staff = payload.staff;
    new_staff.password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    Ok(Json(state.staff_service.create_staff(new_staff).await?))
}

async fn get_staff(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Staff>> {
    user.require(STAFF_ADMIN)?;
    Ok(Json(state.staff_service.get_staff(&id)?))
}

async fn update_staff(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(update): Json<StaffUpdate>,
) -> ApiResult<Json<Staff>> {
    user.require(STAFF_ADMIN)?;
    Ok(Json(state.staff_service.update_staff(&id, update).await?))
}

async fn delete_staff(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    user.require(STAFF_ADMIN)?;
    if user.staff_id.as_deref() == Some(id.as_str()) {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    state.staff_service.delete_staff(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Staff admins may reset anyone's password; everyone may change their own.
async fn set_password(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<PasswordRequest>,
) -> ApiResult<StatusCode> {
    if user.staff_id.as_deref() != Some(id.as_str()) {
        user.require(STAFF_ADMIN)?;
    }
    let hash = hash_password(&payload.password)?;
    state.staff_service.set_password_hash(&id, hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/staff", get(list_staff).post(create_staff))
        .route(
            "/staff/{id}",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route("/staff/{id}/password", put(set_password))
}

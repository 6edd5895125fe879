use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use septic_core::staff::{Staff, StaffRole};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

/// Roles allowed to manage staff accounts.
pub const STAFF_ADMIN: &[StaffRole] = &[StaffRole::Admin];
/// Roles allowed to change system types and the budget item catalog.
pub const CATALOG_WRITE: &[StaffRole] = &[StaffRole::Admin];
/// Roles allowed to work with permits and budgets.
pub const FRONT_OFFICE: &[StaffRole] = &[StaffRole::Admin, StaffRole::Recept];
/// Roles allowed to manage works.
pub const WORKS_MANAGE: &[StaffRole] = &[StaffRole::Admin, StaffRole::Recept];
/// Roles allowed to read works, move their status and log materials.
pub const WORKS_FIELD: &[StaffRole] = &[StaffRole::Admin, StaffRole::Recept, StaffRole::Worker];
/// Roles allowed to touch money: incomes, expenses, receipts, invoices, balance.
pub const FINANCE: &[StaffRole] = &[StaffRole::Admin, StaffRole::Finance];

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    InvalidCredentials,
    NotConfigured,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
    iat: usize,
}

/// The caller, as established by `require_jwt`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// `None` when authentication is disabled.
    pub staff_id: Option<String>,
    pub role: StaffRole,
}

impl AuthUser {
    fn anonymous_owner() -> Self {
        Self {
            staff_id: None,
            role: StaffRole::Owner,
        }
    }

    /// Owner passes every list.
    pub fn has_any(&self, allowed: &[StaffRole]) -> bool {
        self.role == StaffRole::Owner || allowed.contains(&self.role)
    }

    pub fn require(&self, allowed: &[StaffRole]) -> ApiResult<()> {
        if self.has_any(allowed) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role {} is not allowed to perform this action",
                self.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub staff: Staff,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub requires_password: bool,
}

impl AuthManager {
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    pub fn issue_token(&self, staff: &Staff) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: staff.id.clone(),
            role: staff.role.as_str().to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
                | jsonwebtoken::errors::ErrorKind::Json(_) => AuthError::Unauthorized,
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            },
        )?;
        let role = data
            .claims
            .role
            .parse::<StaffRole>()
            .map_err(|_| AuthError::Unauthorized)?;
        Ok(AuthUser {
            staff_id: Some(data.claims.sub),
            role,
        })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AuthError::NotConfigured => (
                StatusCode::NOT_FOUND,
                "Authentication is not configured for this server".to_string(),
            ),
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "authentication failure");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(AuthErrorBody {
            error: status.canonical_reason().unwrap_or("Error"),
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> ApiResult<String> {
    if password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => AuthError::InvalidCredentials,
            other => AuthError::Internal(format!("Password verification failed: {other}")),
        })
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let auth = state.auth.as_ref().ok_or(AuthError::NotConfigured)?;
    let staff = state
        .staff_service
        .find_by_email(&payload.email)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .filter(|s| s.is_active)
        .ok_or(AuthError::InvalidCredentials)?;
    let stored_hash = staff
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;
    verify_password(stored_hash, &payload.password)?;

    let token = auth.issue_token(&staff)?;
    tracing::info!(staff_id = %staff.id, role = %staff.role, "staff logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: auth.expires_in().as_secs(),
        staff,
    }))
}

pub async fn auth_status(State(state): State<Arc<AppState>>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        requires_password: state.auth.is_some(),
    })
}

pub async fn me(State(state): State<Arc<AppState>>, user: AuthUser) -> ApiResult<Json<Staff>> {
    let staff_id = user.staff_id.ok_or(ApiError::NotFound)?;
    Ok(Json(state.staff_service.get_staff(&staff_id)?))
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(auth) = state.auth.as_ref() else {
        request.extensions_mut().insert(AuthUser::anonymous_owner());
        return Ok(next.run(request).await);
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let user = current_staff(&state, auth.validate_token(token)?)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The token only names the caller. Their stored staff row decides whether
/// they may still act and with which role.
fn current_staff(state: &AppState, token_user: AuthUser) -> Result<AuthUser, AuthError> {
    let staff_id = token_user.staff_id.ok_or(AuthError::Unauthorized)?;
    let staff = match state.staff_service.get_staff(&staff_id) {
        Ok(staff) => staff,
        Err(err) if err.is_not_found() => return Err(AuthError::Unauthorized),
        Err(err) => return Err(AuthError::Internal(err.to_string())),
    };
    if !staff.is_active {
        tracing::warn!(staff_id = %staff.id, "rejected token of deactivated staff");
        return Err(AuthError::Unauthorized);
    }
    Ok(AuthUser {
        staff_id: Some(staff.id),
        role: staff.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_must_be_32_bytes() {
        assert!(decode_secret_key("0123456789abcdef0123456789abcdef").is_ok());
        assert!(decode_secret_key("too-short").is_err());
        assert!(decode_secret_key("   ").is_err());
    }

    #[test]
    fn owner_passes_every_role_list() {
        let owner = AuthUser::anonymous_owner();
        assert!(owner.require(FINANCE).is_ok());
        let worker = AuthUser {
            staff_id: Some("s1".into()),
            role: StaffRole::Worker,
        };
        assert!(worker.require(WORKS_FIELD).is_ok());
        assert!(worker.require(FINANCE).is_err());
    }

    #[test]
    fn token_carries_staff_id_and_role() {
        let manager = AuthManager::new(&[7u8; 32], Duration::from_secs(60));
        let now = chrono::Utc::now().naive_utc();
        let staff = Staff {
            id: "staff-1".into(),
            name: "Marta".into(),
            email: "marta@example.com".into(),
            phone: None,
            role: StaffRole::Finance,
            is_active: true,
            password_hash: None,
            created_at: now,
            updated_at: now,
        };
        let token = manager.issue_token(&staff).unwrap();
        let user = manager.validate_token(&token).unwrap();
        assert_eq!(user.staff_id.as_deref(), Some("staff-1"));
        assert_eq!(user.role, StaffRole::Finance);

        let other = AuthManager::new(&[9u8; 32], Duration::from_secs(60));
        assert!(matches!(
            other.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("septic-secret").unwrap();
        assert!(verify_password(&hash, "septic-secret").is_ok());
        assert!(matches!(
            verify_password(&hash, "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(hash_password("short").is_err());
    }
}

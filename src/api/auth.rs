use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use axum::http::HeaderMap;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::RoleName;
use crate::repositories;
use crate::schemas::auth::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/refresh", post(refresh))
        .route("/change-password", put(change_password))
}

/// Missing and empty are the same thing here: the frontend sends empty
/// strings for untouched inputs.
fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::BadRequest(format!("El campo {field} es requerido"))),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = required(&payload.email, "email")?;
    let password = required(&payload.password, "password")?;
    let first_name = required(&payload.first_name, "first_name")?;
    let last_name = required(&payload.last_name, "last_name")?;
    let role_raw = required(&payload.role, "role")?;

    validation::validate_email(email)?;

    let existing = repositories::users::email_exists(state.db(), email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing email"))?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("El email ya está registrado".to_string()));
    }

    validation::validate_password(password)?;

    // Admin accounts are provisioned at bootstrap, never self-registered.
    let role_name = RoleName::parse(&role_raw.to_lowercase())
        .filter(|role| *role != RoleName::Admin)
        .ok_or_else(|| {
            ApiError::BadRequest("Rol inválido. Use: estudiante, docente".to_string())
        })?;

    let role = repositories::roles::find_by_name(state.db(), role_name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load role"))?
        .ok_or_else(|| {
            ApiError::BadRequest("Rol inválido. Use: estudiante, docente".to_string())
        })?;

    let password_hash = security::hash_password(password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            email,
            password_hash,
            first_name,
            last_name,
            phone: payload.phone.as_deref(),
            document_type: payload.document_type.as_deref(),
            document_number: payload.document_number.as_deref(),
            birth_date: payload.birth_date,
            institution: payload.institution.as_deref(),
            grade: payload.grade.as_deref(),
            role_id: role.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    let (access_token, refresh_token) = issue_tokens(&state, user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Usuario registrado exitosamente".to_string(),
            user: UserResponse::from_db(user),
            access_token,
            refresh_token,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(email), Some(password)) = (
        payload.email.as_deref().filter(|value| !value.is_empty()),
        payload.password.as_deref().filter(|value| !value.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Email y contraseña son requeridos".to_string()));
    };

    let mut user = repositories::users::find_by_email(state.db(), email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Credenciales inválidas"))?;

    let verified = security::verify_password(password, &user.password_hash)
        .map_err(|_| ApiError::Unauthorized("Credenciales inválidas"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Credenciales inválidas"));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Usuario inactivo. Contacte al administrador"));
    }

    let now = primitive_now_utc();
    repositories::users::update_last_login(state.db(), user.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update last login"))?;
    user.last_login = Some(now);

    let (access_token, refresh_token) = issue_tokens(&state, user.id)?;

    Ok(Json(AuthResponse {
        message: "Inicio de sesión exitoso".to_string(),
        user: UserResponse::from_db(user),
        access_token,
        refresh_token,
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "user": UserResponse::from_db(user) }))
}

/// Refresh takes the refresh token in the Authorization header and mints a
/// new access token. The refresh token itself is not rotated.
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized("Token inválido o expirado"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Token inválido o expirado"))?;

    let claims = security::verify_token(token, state.settings(), security::TOKEN_TYPE_REFRESH)
        .map_err(|_| ApiError::Unauthorized("Token inválido o expirado"))?;

    let user_id: i64 =
        claims.sub.parse().map_err(|_| ApiError::Unauthorized("Token inválido o expirado"))?;

    let access_token = security::create_access_token(user_id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(serde_json::json!({ "access_token": access_token })))
}

async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(current_password), Some(new_password)) = (
        payload.current_password.as_deref().filter(|value| !value.is_empty()),
        payload.new_password.as_deref().filter(|value| !value.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Se requieren ambas contraseñas".to_string()));
    };

    let verified = security::verify_password(current_password, &user.password_hash)
        .map_err(|_| ApiError::Unauthorized("Contraseña actual incorrecta"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Contraseña actual incorrecta"));
    }

    validation::validate_password(new_password)?;

    let password_hash = security::hash_password(new_password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    repositories::users::update_password(state.db(), user.id, &password_hash, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update password"))?;

    Ok(Json(serde_json::json!({ "message": "Contraseña actualizada exitosamente" })))
}

fn issue_tokens(state: &AppState, user_id: i64) -> Result<(String, String), ApiError> {
    let access_token = security::create_access_token(user_id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;
    let refresh_token = security::create_refresh_token(user_id, state.settings())
        .map_err(|e| ApiError::internal(e, "Failed to create refresh token"))?;
    Ok((access_token, refresh_token))
}

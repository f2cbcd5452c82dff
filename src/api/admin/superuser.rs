use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::repositories::stats::StudentExamAggRow;
use crate::schemas::admin::{
    ChangeRoleRequest, StudentStats, SystemStats, UserDetailResponse, UserWithStats,
};
use crate::schemas::exam::ExamResponse;
use crate::schemas::progress::ProgressResponse;
use crate::schemas::user::UserResponse;
use crate::services::scoring::round2;

/// The whole user directory, newest first. Students carry completed-exam
/// aggregates, gathered in one grouped query instead of one per user.
pub(super) async fn all_users(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
) -> Result<Json<serde_json::Value>, ApiError> {
    let users = repositories::users::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    let aggregates: HashMap<i64, StudentExamAggRow> =
        repositories::stats::exam_aggregates_by_student(state.db())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load exam aggregates"))?
            .into_iter()
            .map(|row| (row.student_id, row))
            .collect();

    let entries: Vec<UserWithStats> = users
        .into_iter()
        .map(|user| {
            let stats = user.is_student().then(|| {
                let agg = aggregates.get(&user.id);
                StudentStats {
                    total_exams: agg.map(|a| a.total_exams).unwrap_or(0),
                    average_score: agg.and_then(|a| a.average_score).map(round2).unwrap_or(0.0),
                }
            });
            UserWithStats { user: UserResponse::from_db(user), stats }
        })
        .collect();

    Ok(Json(serde_json::json!({
        "total": entries.len(),
        "users": entries
    })))
}

pub(super) async fn user_detail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::NotFound("Usuario no encontrado"))?;

    let (exams, progress) = if user.is_student() {
        let exams = repositories::exams::list_by_student_desc(state.db(), user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;
        let progress = repositories::progress::list_detailed_by_user(state.db(), user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list progress"))?;
        (
            Some(exams.into_iter().map(ExamResponse::from_db).collect()),
            Some(progress.into_iter().map(ProgressResponse::from_row).collect()),
        )
    } else {
        (None, None)
    };

    Ok(Json(UserDetailResponse { user: UserResponse::from_db(user), exams, progress }))
}

pub(super) async fn toggle_status(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::NotFound("Usuario no encontrado"))?;

    let is_active = !user.is_active;
    repositories::users::set_active(state.db(), user.id, is_active, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to toggle user status"))?;

    let user = repositories::users::fetch_one_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload user"))?;

    let message =
        if is_active { "Usuario activado exitosamente" } else { "Usuario desactivado exitosamente" };

    Ok(Json(serde_json::json!({
        "message": message,
        "user": UserResponse::from_db(user)
    })))
}

pub(super) async fn change_role(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Path(user_id): Path<i64>,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(role_id) = payload.role_id else {
        return Err(ApiError::BadRequest("role_id es requerido".to_string()));
    };

    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::NotFound("Usuario no encontrado"))?;

    let role = repositories::roles::find_by_id(state.db(), role_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load role"))?
        .ok_or(ApiError::NotFound("Rol no encontrado"))?;

    repositories::users::set_role(state.db(), user.id, role.id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to change role"))?;

    let user = repositories::users::fetch_one_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload user"))?;

    Ok(Json(serde_json::json!({
        "message": "Rol actualizado exitosamente",
        "user": UserResponse::from_db(user)
    })))
}

pub(super) async fn system_stats(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
) -> Result<Json<SystemStats>, ApiError> {
    let row = repositories::stats::system_stats(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load system stats"))?;

    Ok(Json(SystemStats::from_row(row)))
}

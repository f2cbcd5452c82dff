use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::progress::{AddPointsRequest, NotificationResponse, ProgressResponse};
use crate::services::progression;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/my-progress", get(my_progress))
        .route("/subject/:subject_id", get(get_subject_progress))
        .route("/add-points", post(add_points))
        .route("/notifications", get(list_notifications))
        .route("/notifications/:notification_id/read", put(mark_notification_read))
}

async fn my_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows = repositories::progress::list_detailed_by_user(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load progress"))?;

    let total_subjects = rows.len();
    let total_points: i64 = rows.iter().map(|row| i64::from(row.total_points)).sum();
    let average_level = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|row| f64::from(row.level)).sum::<f64>() / rows.len() as f64
    };

    Ok(Json(serde_json::json!({
        "progress": rows.into_iter().map(ProgressResponse::from_row).collect::<Vec<_>>(),
        "total_subjects": total_subjects,
        "total_points": total_points,
        "average_level": average_level
    })))
}

/// Progress in one subject, created on first sight so the frontend never
/// has to special-case "not started yet".
async fn get_subject_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = repositories::progress::find_detailed(state.db(), user.id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load progress"))?;

    let row = match existing {
        Some(row) => row,
        None => {
            repositories::subjects::find_by_id(state.db(), subject_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
                .ok_or(ApiError::NotFound("Materia no encontrada"))?;

            repositories::progress::ensure_row(state.db(), user.id, subject_id, primitive_now_utc())
                .await
                .map_err(|e| ApiError::internal(e, "Failed to create progress"))?;

            repositories::progress::find_detailed(state.db(), user.id, subject_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to reload progress"))?
                .ok_or_else(|| {
                    ApiError::Internal("Progress row missing right after insert".to_string())
                })?
        }
    };

    Ok(Json(serde_json::json!({ "progress": ProgressResponse::from_row(row) })))
}

async fn add_points(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AddPointsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Zero points is rejected along with the missing case, there is nothing
    // to credit.
    let (Some(subject_id), Some(points)) =
        (payload.subject_id, payload.points.filter(|points| *points != 0))
    else {
        return Err(ApiError::BadRequest("Subject ID y puntos son requeridos".to_string()));
    };

    repositories::subjects::find_by_id(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
        .ok_or(ApiError::NotFound("Materia no encontrada"))?;

    let now = primitive_now_utc();

    repositories::progress::ensure_row(state.db(), user.id, subject_id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create progress"))?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let row = repositories::progress::lock_row(&mut tx, user.id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to lock progress"))?;

    let total_points = row.total_points + points;
    let level = progression::level_for_points(total_points);
    let streak_days = progression::next_streak(row.last_activity, now, row.streak_days);

    repositories::progress::apply_points(
        &mut tx,
        row.id,
        repositories::progress::ApplyPoints { total_points, level, streak_days, now },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to apply points"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit points"))?;

    let row = repositories::progress::find_detailed(state.db(), user.id, subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload progress"))?
        .ok_or_else(|| ApiError::Internal("Progress row missing after update".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "Puntos agregados exitosamente",
        "progress": ProgressResponse::from_row(row)
    })))
}

async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notifications = repositories::notifications::list_recent_by_user(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list notifications"))?;

    let unread_count = repositories::notifications::unread_count(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count unread notifications"))?;

    Ok(Json(serde_json::json!({
        "notifications": notifications
            .into_iter()
            .map(NotificationResponse::from_db)
            .collect::<Vec<_>>(),
        "unread_count": unread_count
    })))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = repositories::notifications::find_by_id(state.db(), notification_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load notification"))?
        .ok_or(ApiError::NotFound("Notificación no encontrada"))?;

    if notification.user_id != user.id {
        return Err(ApiError::Forbidden("No tienes permiso"));
    }

    repositories::notifications::mark_read(state.db(), notification.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark notification read"))?;

    Ok(Json(serde_json::json!({ "message": "Notificación marcada como leída" })))
}

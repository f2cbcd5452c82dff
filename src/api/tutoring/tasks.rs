use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{TaskPriority, TaskStatus};
use crate::repositories;
use crate::repositories::tasks::TaskScope;
use crate::schemas::tutoring::{parse_due_date, CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::services::tutoring_policy;

pub(super) async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scope = if user.is_student() {
        TaskScope::Student(user.id)
    } else if user.is_teacher() {
        TaskScope::Tutor(user.id)
    } else {
        return Err(ApiError::Forbidden("Rol no autorizado"));
    };

    repositories::tasks::flip_overdue(state.db(), scope, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to flip overdue tasks"))?;

    let tasks = repositories::tasks::list_detailed(state.db(), scope)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tasks"))?;

    Ok(Json(serde_json::json!({
        "total": tasks.len(),
        "tasks": tasks.into_iter().map(TaskResponse::from_row).collect::<Vec<_>>()
    })))
}

pub(super) async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if !user.is_teacher() {
        return Err(ApiError::Forbidden("Solo los docentes pueden crear tareas"));
    }

    let (Some(student_id), Some(title)) = (
        payload.student_id,
        payload.title.as_deref().filter(|text| !text.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Se requiere estudiante y título".to_string()));
    };

    // An unknown student and a student of another tutor get the same answer.
    let student = repositories::users::find_by_id(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or(ApiError::Forbidden("Solo puedes asignar tareas a tus estudiantes bajo tutoría"))?;

    tutoring_policy::can_assign_task(&user, &student).map_err(ApiError::Forbidden)?;

    let due_date = match payload.due_date.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(
            parse_due_date(raw)
                .ok_or_else(|| ApiError::BadRequest("Formato de fecha inválido".to_string()))?,
        ),
        None => None,
    };

    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let task_id = repositories::tasks::create(
        &mut *tx,
        repositories::tasks::CreateTask {
            tutor_id: user.id,
            student_id: student.id,
            subject_id: payload.subject_id,
            title,
            description: payload.description.as_deref(),
            due_date,
            priority: payload.priority.unwrap_or(TaskPriority::Medium),
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store task"))?;

    repositories::notifications::create(
        &mut *tx,
        repositories::notifications::CreateNotification {
            user_id: student.id,
            title: "Nueva tarea asignada",
            message: &format!("Tu tutor te ha asignado la tarea \"{title}\""),
            kind: "info",
            link: None,
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create notification"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit task"))?;

    let row = repositories::tasks::fetch_detail_by_id(state.db(), task_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload task"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Tarea creada exitosamente",
            "task": TaskResponse::from_row(row)
        })),
    ))
}

pub(super) async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = repositories::tasks::find_by_id(state.db(), task_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load task"))?
        .ok_or(ApiError::NotFound("Tarea no encontrada"))?;

    let now = primitive_now_utc();

    if user.is_teacher() && task.tutor_id == user.id {
        // A malformed due_date is dropped, the other fields still land.
        let due_date = payload.due_date.as_deref().and_then(parse_due_date);

        repositories::tasks::tutor_update(
            state.db(),
            task.id,
            repositories::tasks::TutorUpdate {
                title: payload.title,
                description: payload.description,
                due_date,
                priority: payload.priority,
                status: payload.status,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update task"))?;
    } else if user.is_student() && task.student_id == user.id {
        let completed_at = (payload.status == Some(TaskStatus::Completed)).then_some(now);

        repositories::tasks::student_update(
            state.db(),
            task.id,
            repositories::tasks::StudentUpdate {
                status: payload.status,
                completion_note: payload.completion_note,
                completed_at,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update task"))?;
    } else {
        return Err(ApiError::Forbidden("No tienes permiso para modificar esta tarea"));
    }

    let row = repositories::tasks::fetch_detail_by_id(state.db(), task.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload task"))?;

    Ok(Json(serde_json::json!({
        "message": "Tarea actualizada exitosamente",
        "task": TaskResponse::from_row(row)
    })))
}

pub(super) async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !user.is_teacher() {
        return Err(ApiError::Forbidden("Solo los docentes pueden eliminar tareas"));
    }

    let task = repositories::tasks::find_by_id(state.db(), task_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load task"))?
        .ok_or(ApiError::NotFound("Tarea no encontrada"))?;

    if task.tutor_id != user.id {
        return Err(ApiError::Forbidden("No tienes permiso para eliminar esta tarea"));
    }

    repositories::tasks::delete_by_id(state.db(), task.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete task"))?;

    Ok(Json(serde_json::json!({ "message": "Tarea eliminada exitosamente" })))
}

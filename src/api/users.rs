use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::RoleName;
use crate::repositories;
use crate::schemas::user::{
    ProfileResponse, ProfileStats, TutorAssignmentRequest, UpdateProfileRequest, UserResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/students", get(list_students))
        .route("/assign-tutor", post(assign_tutor))
        .route("/remove-tutor", post(remove_tutor))
        .route("/my-tutees", get(my_tutees))
        .route("/my-tutor", get(my_tutor))
        .route("/:user_id", get(get_user))
}

async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let total_exams = repositories::exams::count_completed_by_student(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count exams"))?;
    let total_points = repositories::progress::sum_points_by_user(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to sum points"))?;
    let subjects_in_progress = repositories::progress::count_by_user(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count progress rows"))?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from_db(user),
        stats: ProfileStats { total_exams, total_points, subjects_in_progress },
    }))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    repositories::users::update_profile(
        state.db(),
        user.id,
        repositories::users::UpdateProfile {
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            institution: payload.institution,
            grade: payload.grade,
            avatar_url: payload.avatar_url,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    let user = repositories::users::fetch_one_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload user"))?;

    Ok(Json(serde_json::json!({
        "message": "Perfil actualizado exitosamente",
        "user": UserResponse::from_db(user)
    })))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = fetch_user(&state, user_id).await?;

    Ok(Json(serde_json::json!({ "user": UserResponse::from_db(user) })))
}

async fn list_students(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("Acceso denegado"));
    }

    let students = repositories::users::list_students(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(serde_json::json!({
        "total": students.len(),
        "students": students.into_iter().map(UserResponse::from_db).collect::<Vec<_>>()
    })))
}

async fn assign_tutor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TutorAssignmentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("Acceso denegado. Solo docentes pueden asignar tutorías"));
    }

    let student_id = payload
        .student_id
        .ok_or_else(|| ApiError::BadRequest("Se requiere el ID del estudiante".to_string()))?;

    let student = fetch_student(&state, student_id).await?;

    if student.role_name != RoleName::Estudiante {
        return Err(ApiError::BadRequest("El usuario no es un estudiante".to_string()));
    }

    repositories::users::set_tutor(state.db(), student.id, Some(user.id), primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to assign tutor"))?;

    let student = repositories::users::fetch_one_by_id(state.db(), student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload student"))?;

    Ok(Json(serde_json::json!({
        "message": "Tutoría asignada exitosamente",
        "student": UserResponse::from_db(student)
    })))
}

async fn remove_tutor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TutorAssignmentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("Acceso denegado. Solo docentes pueden remover tutorías"));
    }

    let student_id = payload
        .student_id
        .ok_or_else(|| ApiError::BadRequest("Se requiere el ID del estudiante".to_string()))?;

    let student = fetch_student(&state, student_id).await?;

    if student.tutor_id != Some(user.id) {
        return Err(ApiError::Forbidden("No eres el tutor de este estudiante"));
    }

    repositories::users::set_tutor(state.db(), student.id, None, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to remove tutor"))?;

    let student = repositories::users::fetch_one_by_id(state.db(), student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload student"))?;

    Ok(Json(serde_json::json!({
        "message": "Tutoría removida exitosamente",
        "student": UserResponse::from_db(student)
    })))
}

async fn my_tutees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("Acceso denegado"));
    }

    let tutees = repositories::users::list_tutees(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tutees"))?;

    Ok(Json(serde_json::json!({
        "total": tutees.len(),
        "students": tutees.into_iter().map(UserResponse::from_db).collect::<Vec<_>>()
    })))
}

async fn my_tutor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Estudiante {
        return Err(ApiError::Forbidden("Solo estudiantes tienen tutores asignados"));
    }

    let Some(tutor_id) = user.tutor_id else {
        return Ok(Json(serde_json::json!({
            "tutor": null,
            "message": "No tienes tutor asignado"
        })));
    };

    let tutor = fetch_user(&state, tutor_id).await?;

    Ok(Json(serde_json::json!({
        "tutor": {
            "id": tutor.id,
            "full_name": tutor.full_name(),
            "email": tutor.email,
            "phone": tutor.phone
        }
    })))
}

async fn fetch_user(state: &AppState, user_id: i64) -> Result<User, ApiError> {
    repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::NotFound("Usuario no encontrado"))
}

async fn fetch_student(state: &AppState, student_id: i64) -> Result<User, ApiError> {
    repositories::users::find_by_id(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or(ApiError::NotFound("Estudiante no encontrado"))
}

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentTeacher;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::admin::{GradeExamRequest, GradeResponse};
use crate::schemas::exam::ExamResponse;
use crate::services::scoring;

pub(super) async fn grade_exam(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    Json(payload): Json<GradeExamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(exam_id) = payload.exam_id else {
        return Err(ApiError::BadRequest("exam_id es requerido".to_string()));
    };

    let exam = repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam"))?
        .ok_or(ApiError::NotFound("Examen no encontrado"))?;

    // The teacher's score wins; the exam's automatic score backs it up.
    let Some(score) = payload.score.or(exam.score) else {
        return Err(ApiError::BadRequest("Se requiere una calificación".to_string()));
    };

    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let grade = repositories::grades::upsert(
        &mut *tx,
        repositories::grades::UpsertGrade {
            exam_id: exam.id,
            teacher_id: teacher.id,
            score,
            feedback: payload.feedback.as_deref(),
            strengths: payload.strengths.as_deref(),
            improvements: payload.improvements.as_deref(),
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to upsert grade"))?;

    repositories::notifications::create(
        &mut *tx,
        repositories::notifications::CreateNotification {
            user_id: exam.student_id,
            title: "Examen calificado",
            message: &format!("Tu examen \"{}\" ha sido calificado", exam.title),
            kind: "exam",
            link: None,
            now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create notification"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit grade"))?;

    Ok(Json(serde_json::json!({
        "message": "Examen calificado exitosamente",
        "grade": GradeResponse::from_db(grade)
    })))
}

pub(super) async fn student_exams(
    State(state): State<AppState>,
    CurrentTeacher(_): CurrentTeacher,
    Path(student_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let exams = repositories::exams::list_by_student_desc(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student exams"))?;

    let mut detailed = Vec::with_capacity(exams.len());
    for exam in exams {
        let answers = repositories::exam_answers::list_detailed_by_exam(state.db(), exam.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load exam answers"))?;
        detailed.push(ExamResponse::with_answers(exam, answers));
    }

    Ok(Json(serde_json::json!({
        "total": detailed.len(),
        "exams": detailed
    })))
}

pub(super) async fn stats(
    State(state): State<AppState>,
    CurrentTeacher(_): CurrentTeacher,
) -> Result<Json<serde_json::Value>, ApiError> {
    let row = repositories::stats::teacher_stats(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load stats"))?;

    Ok(Json(serde_json::json!({
        "total_students": row.total_students,
        "total_exams": row.total_exams,
        "pending_reviews": row.pending_reviews,
        "average_score": row.average_score.map(scoring::round2).unwrap_or(0.0)
    })))
}

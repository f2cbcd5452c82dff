use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::exams::helpers;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{ExamStatus, ExamType, RoleName};
use crate::repositories;
use crate::repositories::questions::PoolScope;
use crate::schemas::exam::{
    ExamCreateRequest, ExamListQuery, ExamResponse, SubmitExamRequest, SubmitResults,
};
use crate::schemas::subject::QuestionResponse;
use crate::services::{sampling, scoring};

const DEFAULT_TOTAL_QUESTIONS: i32 = 10;
const DEFAULT_TIME_LIMIT_MINUTES: i32 = 60;

pub(super) async fn create_exam(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ExamCreateRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(title), Some(subject_id)) = (
        payload.title.as_deref().filter(|value| !value.is_empty()),
        payload.subject_id,
    ) else {
        return Err(ApiError::BadRequest("Título y materia son requeridos".to_string()));
    };

    let total_questions = payload.total_questions.unwrap_or(DEFAULT_TOTAL_QUESTIONS);
    let time_limit = payload.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES);
    let exam_type = payload.exam_type.unwrap_or(ExamType::Practice);

    let scope = match payload.topic_id {
        Some(topic_id) => PoolScope::Topic(topic_id),
        None => PoolScope::Subject(subject_id),
    };

    let pool = repositories::questions::pool_for_scope(state.db(), scope, payload.difficulty)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question pool"))?;

    if total_questions <= 0 || pool.len() < total_questions as usize {
        return Err(ApiError::BadRequest("No hay suficientes preguntas disponibles".to_string()));
    }

    let selected = sampling::draw_questions(pool, total_questions as usize);

    let exam = repositories::exams::create(
        state.db(),
        repositories::exams::CreateExam {
            student_id: user.id,
            subject_id,
            exam_type,
            title,
            total_questions,
            time_limit,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create exam"))?;

    let questions = selected
        .into_iter()
        .map(|question| QuestionResponse::from_db(question, false))
        .collect::<Vec<_>>();

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Examen creado exitosamente",
            "exam": ExamResponse::from_db(exam),
            "questions": questions
        })),
    ))
}

pub(super) async fn submit_exam(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(exam_id): Path<i64>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let exam = repositories::exams::lock_by_id(&mut tx, exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam"))?
        .ok_or(ApiError::NotFound("Examen no encontrado"))?;

    if exam.student_id != user.id {
        return Err(ApiError::Forbidden("No tienes permiso para este examen"));
    }

    if exam.status == ExamStatus::Completed {
        return Err(ApiError::BadRequest("Este examen ya fue completado".to_string()));
    }

    if payload.answers.is_empty() {
        return Err(ApiError::BadRequest("No se enviaron respuestas".to_string()));
    }

    let now = primitive_now_utc();
    let mut total_score: i64 = 0;
    let mut correct_count: i64 = 0;

    for answer in &payload.answers {
        let question = repositories::questions::find_by_id(state.db(), answer.question_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load question"))?;

        let Some(question) = question else {
            tracing::warn!(
                exam_id,
                question_id = answer.question_id,
                "Submitted answer references an unknown question, skipping"
            );
            continue;
        };

        let outcome = scoring::evaluate_answer(
            question.correct_answer,
            answer.answer.as_deref(),
            question.points,
        );

        repositories::exam_answers::create(
            &mut tx,
            repositories::exam_answers::CreateExamAnswer {
                exam_id: exam.id,
                question_id: question.id,
                user_answer: answer.answer.as_deref(),
                is_correct: outcome.is_correct,
                points_earned: outcome.points_earned,
                time_spent: Some(answer.time_spent.unwrap_or(0)),
                now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store exam answer"))?;

        total_score += i64::from(outcome.points_earned);
        if outcome.is_correct {
            correct_count += 1;
        }
    }

    let percentage = scoring::percentage(correct_count, i64::from(exam.total_questions));
    let exam = repositories::exams::finalize(&mut tx, exam.id, now, total_score as f64, percentage)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to finalize exam"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit submission"))?;

    let exam = helpers::exam_with_optional_answers(&state, exam, true).await?;
    let results = SubmitResults {
        total_questions: exam.total_questions,
        correct_answers: correct_count,
        score: total_score,
        percentage: scoring::round2(percentage),
    };

    Ok(Json(serde_json::json!({
        "message": "Examen enviado exitosamente",
        "exam": exam,
        "results": results
    })))
}

pub(super) async fn my_exams(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ExamListQuery>,
) -> Result<Json<PaginatedResponse<ExamResponse>>, ApiError> {
    let exams = repositories::exams::list_by_student(
        state.db(),
        user.id,
        query.status,
        query.skip,
        query.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    let total_count = repositories::exams::count_by_student(state.db(), user.id, query.status)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count exams"))?;

    Ok(Json(PaginatedResponse {
        items: exams.into_iter().map(ExamResponse::from_db).collect(),
        total_count,
        skip: query.skip.max(0),
        limit: query.limit.clamp(1, 100),
    }))
}

pub(super) async fn get_exam(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(exam_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let exam = helpers::fetch_exam(&state, exam_id).await?;

    if exam.student_id != user.id && user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("No tienes permiso para ver este examen"));
    }

    let include_answers = exam.status == ExamStatus::Completed;
    let exam = helpers::exam_with_optional_answers(&state, exam, include_answers).await?;

    Ok(Json(serde_json::json!({ "exam": exam })))
}

pub(super) async fn pending_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.role_name != RoleName::Docente {
        return Err(ApiError::Forbidden("Acceso denegado"));
    }

    let exams = repositories::exams::list_pending_review(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list pending exams"))?;

    Ok(Json(serde_json::json!({
        "total": exams.len(),
        "exams": exams.into_iter().map(ExamResponse::from_db).collect::<Vec<_>>()
    })))
}

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::subject::{
    QuestionListQuery, QuestionResponse, SubjectDetailResponse, SubjectResponse, TopicResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects))
        .route("/:subject_id", get(get_subject))
        .route("/:subject_id/topics", get(list_topics))
        .route("/topics/:topic_id/questions", get(list_questions))
}

async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let subjects = repositories::subjects::list_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list subjects"))?;

    Ok(Json(serde_json::json!({
        "total": subjects.len(),
        "subjects": subjects.into_iter().map(SubjectResponse::from_db).collect::<Vec<_>>()
    })))
}

async fn get_subject(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(subject_id): Path<i64>,
) -> Result<Json<SubjectDetailResponse>, ApiError> {
    let subject = repositories::subjects::find_by_id(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
        .ok_or(ApiError::NotFound("Materia no encontrada"))?;

    let topics = repositories::topics::list_active_by_subject(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;

    Ok(Json(SubjectDetailResponse {
        subject: SubjectResponse::from_db(subject),
        topics: topics.into_iter().map(TopicResponse::from_db).collect(),
    }))
}

/// A subject nobody created yet just lists zero topics, same as an empty one.
async fn list_topics(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(subject_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let topics = repositories::topics::list_active_by_subject(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;

    Ok(Json(serde_json::json!({
        "total": topics.len(),
        "topics": topics.into_iter().map(TopicResponse::from_db).collect::<Vec<_>>()
    })))
}

async fn list_questions(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(topic_id): Path<i64>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<PaginatedResponse<QuestionResponse>>, ApiError> {
    let questions = repositories::questions::list_by_topic(
        state.db(),
        topic_id,
        query.difficulty,
        query.skip,
        query.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let total_count = repositories::questions::count_by_topic(state.db(), topic_id, query.difficulty)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

    Ok(Json(PaginatedResponse {
        items: questions
            .into_iter()
            .map(|question| QuestionResponse::from_db(question, false))
            .collect(),
        total_count,
        skip: query.skip.max(0),
        limit: query.limit.clamp(1, 100),
    }))
}

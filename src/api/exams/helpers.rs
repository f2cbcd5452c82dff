use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::Exam;
use crate::repositories;
use crate::schemas::exam::ExamResponse;

pub(super) async fn fetch_exam(state: &AppState, exam_id: i64) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam"))?
        .ok_or(ApiError::NotFound("Examen no encontrado"))
}

/// Completed exams travel with their answer breakdown, in-progress ones
/// without it.
pub(super) async fn exam_with_optional_answers(
    state: &AppState,
    exam: Exam,
    include_answers: bool,
) -> Result<ExamResponse, ApiError> {
    if !include_answers {
        return Ok(ExamResponse::from_db(exam));
    }

    let answers = repositories::exam_answers::list_detailed_by_exam(state.db(), exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam answers"))?;

    Ok(ExamResponse::with_answers(exam, answers))
}

use time::PrimitiveDateTime;

use crate::db::models::Grade;
use crate::db::types::GradeStatus;

const COLUMNS: &str = "\
    id, exam_id, teacher_id, score, feedback, strengths, improvements, status, \
    created_at, updated_at";

pub(crate) struct UpsertGrade<'a> {
    pub exam_id: i64,
    pub teacher_id: i64,
    pub score: f64,
    pub feedback: Option<&'a str>,
    pub strengths: Option<&'a str>,
    pub improvements: Option<&'a str>,
    pub now: PrimitiveDateTime,
}

/// One grade per exam. Re-grading updates the review in place but keeps
/// the teacher who graded first.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertGrade<'_>,
) -> Result<Grade, sqlx::Error> {
    sqlx::query_as::<_, Grade>(&format!(
        "INSERT INTO grades (
            exam_id, teacher_id, score, feedback, strengths, improvements,
            status, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$8)
        ON CONFLICT (exam_id) DO UPDATE SET
            score = EXCLUDED.score,
            feedback = EXCLUDED.feedback,
            strengths = EXCLUDED.strengths,
            improvements = EXCLUDED.improvements,
            status = EXCLUDED.status,
            updated_at = EXCLUDED.updated_at
        RETURNING {COLUMNS}"
    ))
    .bind(params.exam_id)
    .bind(params.teacher_id)
    .bind(params.score)
    .bind(params.feedback)
    .bind(params.strengths)
    .bind(params.improvements)
    .bind(GradeStatus::Reviewed)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

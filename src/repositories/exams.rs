use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder, Transaction};
use time::PrimitiveDateTime;

use crate::db::models::Exam;
use crate::db::types::{ExamStatus, ExamType};

const COLUMNS: &str = "\
    id, student_id, subject_id, exam_type, title, total_questions, time_limit, \
    start_time, end_time, status, score, percentage, created_at";

pub(crate) struct CreateExam<'a> {
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_type: ExamType,
    pub title: &'a str,
    pub total_questions: i32,
    pub time_limit: i32,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            student_id, subject_id, exam_type, title, total_questions,
            time_limit, start_time, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}"
    ))
    .bind(params.student_id)
    .bind(params.subject_id)
    .bind(params.exam_type)
    .bind(params.title)
    .bind(params.total_questions)
    .bind(params.time_limit)
    .bind(params.now)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Row-locked read used by submission so two concurrent submits of the
/// same exam serialize instead of double-finalizing.
pub(crate) async fn lock_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1 FOR UPDATE"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub(crate) async fn finalize(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    end_time: PrimitiveDateTime,
    score: f64,
    percentage: f64,
) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams
         SET end_time = $1, status = $2, score = $3, percentage = $4
         WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(end_time)
    .bind(ExamStatus::Completed)
    .bind(score)
    .bind(percentage)
    .bind(id)
    .fetch_one(&mut **tx)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: i64,
    status: Option<ExamStatus>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM exams WHERE student_id = "
    ));
    builder.push_bind(student_id);

    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY created_at DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 100));

    builder.build_query_as::<Exam>().fetch_all(pool).await
}

pub(crate) async fn count_by_student(
    pool: &PgPool,
    student_id: i64,
    status: Option<ExamStatus>,
) -> Result<i64, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM exams WHERE student_id = ");
    builder.push_bind(student_id);

    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn list_by_student_desc(
    pool: &PgPool,
    student_id: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE student_id = $1 ORDER BY created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Completed exams no teacher has graded yet.
pub(crate) async fn list_pending_review(pool: &PgPool) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams e
         WHERE e.status = $1
           AND NOT EXISTS (SELECT 1 FROM grades g WHERE g.exam_id = e.id)
         ORDER BY e.created_at DESC"
    ))
    .bind(ExamStatus::Completed)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_completed_by_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exams WHERE student_id = $1 AND status = $2")
        .bind(student_id)
        .bind(ExamStatus::Completed)
        .fetch_one(pool)
        .await
}

use sqlx::PgPool;
use sqlx::{Postgres, Transaction};
use time::PrimitiveDateTime;

use crate::db::types::{AnswerChoice, Difficulty};

/// Answer joined with its question, as the review endpoints return it.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AnswerDetailRow {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) question_id: i64,
    pub(crate) user_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
    pub(crate) time_spent: Option<i32>,
    pub(crate) topic_id: i64,
    pub(crate) question_text: String,
    pub(crate) question_type: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) correct_answer: AnswerChoice,
    pub(crate) explanation: Option<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) image_url: Option<String>,
    pub(crate) points: i32,
}

pub(crate) struct CreateExamAnswer<'a> {
    pub exam_id: i64,
    pub question_id: i64,
    pub user_answer: Option<&'a str>,
    pub is_correct: bool,
    pub points_earned: i32,
    pub time_spent: Option<i32>,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create(
    tx: &mut Transaction<'_, Postgres>,
    params: CreateExamAnswer<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO exam_answers (
            exam_id, question_id, user_answer, is_correct, points_earned,
            time_spent, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)",
    )
    .bind(params.exam_id)
    .bind(params.question_id)
    .bind(params.user_answer)
    .bind(params.is_correct)
    .bind(params.points_earned)
    .bind(params.time_spent)
    .bind(params.now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub(crate) async fn list_detailed_by_exam(
    pool: &PgPool,
    exam_id: i64,
) -> Result<Vec<AnswerDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, AnswerDetailRow>(
        "SELECT a.id,
                a.exam_id,
                a.question_id,
                a.user_answer,
                a.is_correct,
                a.points_earned,
                a.time_spent,
                q.topic_id,
                q.question_text,
                q.question_type,
                q.option_a,
                q.option_b,
                q.option_c,
                q.option_d,
                q.correct_answer,
                q.explanation,
                q.difficulty,
                q.image_url,
                q.points
         FROM exam_answers a
         JOIN questions q ON q.id = a.question_id
         WHERE a.exam_id = $1
         ORDER BY a.id",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

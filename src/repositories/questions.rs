use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder};

use crate::db::models::Question;
use crate::db::types::Difficulty;

const COLUMNS: &str = "\
    q.id, q.topic_id, q.question_text, q.question_type, q.option_a, q.option_b, \
    q.option_c, q.option_d, q.correct_answer, q.explanation, q.difficulty, \
    q.image_url, q.points, q.is_active, q.created_at";

/// Where an exam draws its questions from: a single topic, or every topic
/// of a subject.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PoolScope {
    Topic(i64),
    Subject(i64),
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions q WHERE q.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every active question inside the scope, optionally narrowed by
/// difficulty. The exam service samples from this set.
pub(crate) async fn pool_for_scope(
    pool: &PgPool,
    scope: PoolScope,
    difficulty: Option<Difficulty>,
) -> Result<Vec<Question>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM questions q"));

    match scope {
        PoolScope::Topic(topic_id) => {
            builder.push(" WHERE q.is_active = TRUE AND q.topic_id = ");
            builder.push_bind(topic_id);
        }
        PoolScope::Subject(subject_id) => {
            builder.push(
                " JOIN topics t ON t.id = q.topic_id
                  WHERE q.is_active = TRUE AND t.subject_id = ",
            );
            builder.push_bind(subject_id);
        }
    }

    if let Some(difficulty) = difficulty {
        builder.push(" AND q.difficulty = ");
        builder.push_bind(difficulty);
    }

    builder.build_query_as::<Question>().fetch_all(pool).await
}

pub(crate) async fn list_by_topic(
    pool: &PgPool,
    topic_id: i64,
    difficulty: Option<Difficulty>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM questions q WHERE q.is_active = TRUE AND q.topic_id = "
    ));
    builder.push_bind(topic_id);

    if let Some(difficulty) = difficulty {
        builder.push(" AND q.difficulty = ");
        builder.push_bind(difficulty);
    }

    builder.push(" ORDER BY q.id OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 100));

    builder.build_query_as::<Question>().fetch_all(pool).await
}

pub(crate) async fn count_by_topic(
    pool: &PgPool,
    topic_id: i64,
    difficulty: Option<Difficulty>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM questions q WHERE q.is_active = TRUE AND q.topic_id = ",
    );
    builder.push_bind(topic_id);

    if let Some(difficulty) = difficulty {
        builder.push(" AND q.difficulty = ");
        builder.push_bind(difficulty);
    }

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

use sqlx::PgPool;

use crate::db::models::Topic;

const COLUMNS: &str = "\
    t.id, t.subject_id, t.name, t.description, t.difficulty, t.sort_order, \
    t.is_active, t.created_at, \
    (SELECT COUNT(*) FROM questions q WHERE q.topic_id = t.id) AS total_questions";

pub(crate) async fn list_active_by_subject(
    pool: &PgPool,
    subject_id: i64,
) -> Result<Vec<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "SELECT {COLUMNS}
         FROM topics t
         WHERE t.subject_id = $1 AND t.is_active = TRUE
         ORDER BY t.sort_order"
    ))
    .bind(subject_id)
    .fetch_all(pool)
    .await
}

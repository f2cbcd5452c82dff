use sqlx::PgPool;

use crate::db::models::Subject;

const COLUMNS: &str = "\
    s.id, s.name, s.description, s.icon, s.color, s.sort_order, s.is_active, \
    s.created_at, \
    (SELECT COUNT(*) FROM topics t WHERE t.subject_id = s.id) AS total_topics";

pub(crate) async fn list_active(pool: &PgPool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {COLUMNS} FROM subjects s WHERE s.is_active = TRUE ORDER BY s.sort_order"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {COLUMNS} FROM subjects s WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

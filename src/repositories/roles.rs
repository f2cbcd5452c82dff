use sqlx::PgPool;

use crate::db::models::Role;
use crate::db::types::RoleName;

const COLUMNS: &str = "id, name, description, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM roles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_name(
    pool: &PgPool,
    name: RoleName,
) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM roles WHERE name = $1"))
        .bind(name)
        .fetch_optional(pool)
        .await
}

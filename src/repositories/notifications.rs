use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Notification;

const COLUMNS: &str = "id, user_id, title, message, kind, is_read, link, created_at";

pub(crate) struct CreateNotification<'a> {
    pub user_id: i64,
    pub title: &'a str,
    pub message: &'a str,
    pub kind: &'a str,
    pub link: Option<&'a str>,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateNotification<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO notifications (user_id, title, message, kind, link, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.user_id)
    .bind(params.title)
    .bind(params.message)
    .bind(params.kind)
    .bind(params.link)
    .bind(params.now)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn list_recent_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notifications
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT 50"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn unread_count(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!("SELECT {COLUMNS} FROM notifications WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn mark_read(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

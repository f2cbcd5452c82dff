use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Message;

const COLUMNS: &str = "\
    id, sender_id, receiver_id, subject, message, is_read, read_at, created_at";

/// Message joined with sender and receiver briefs.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageDetailRow {
    pub(crate) id: i64,
    pub(crate) subject: Option<String>,
    pub(crate) message: String,
    pub(crate) is_read: bool,
    pub(crate) read_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) sender_id: i64,
    pub(crate) sender_first_name: String,
    pub(crate) sender_last_name: String,
    pub(crate) sender_email: String,
    pub(crate) receiver_id: i64,
    pub(crate) receiver_first_name: String,
    pub(crate) receiver_last_name: String,
    pub(crate) receiver_email: String,
}

const DETAIL_SELECT: &str = "\
    SELECT m.id,
           m.subject,
           m.message,
           m.is_read,
           m.read_at,
           m.created_at,
           snd.id AS sender_id,
           snd.first_name AS sender_first_name,
           snd.last_name AS sender_last_name,
           snd.email AS sender_email,
           rcv.id AS receiver_id,
           rcv.first_name AS receiver_first_name,
           rcv.last_name AS receiver_last_name,
           rcv.email AS receiver_email
    FROM messages m
    JOIN users snd ON snd.id = m.sender_id
    JOIN users rcv ON rcv.id = m.receiver_id";

pub(crate) async fn list_received(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<MessageDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageDetailRow>(&format!(
        "{DETAIL_SELECT} WHERE m.receiver_id = $1 ORDER BY m.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_sent(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<MessageDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageDetailRow>(&format!(
        "{DETAIL_SELECT} WHERE m.sender_id = $1 ORDER BY m.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn unread_count(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Both directions between two users, oldest first.
pub(crate) async fn conversation(
    pool: &PgPool,
    user_id: i64,
    other_user_id: i64,
) -> Result<Vec<MessageDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageDetailRow>(&format!(
        "{DETAIL_SELECT}
         WHERE (m.sender_id = $1 AND m.receiver_id = $2)
            OR (m.sender_id = $2 AND m.receiver_id = $1)
         ORDER BY m.created_at ASC"
    ))
    .bind(user_id)
    .bind(other_user_id)
    .fetch_all(pool)
    .await
}

/// Marks everything the caller received from the other user as read.
pub(crate) async fn mark_conversation_read(
    pool: &PgPool,
    receiver_id: i64,
    sender_id: i64,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE messages
         SET is_read = TRUE, read_at = $1
         WHERE sender_id = $2 AND receiver_id = $3 AND is_read = FALSE",
    )
    .bind(now)
    .bind(sender_id)
    .bind(receiver_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!("SELECT {COLUMNS} FROM messages WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_detail_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<MessageDetailRow, sqlx::Error> {
    sqlx::query_as::<_, MessageDetailRow>(&format!("{DETAIL_SELECT} WHERE m.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateMessage<'a> {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: Option<&'a str>,
    pub message: &'a str,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateMessage<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO messages (sender_id, receiver_id, subject, message, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING id",
    )
    .bind(params.sender_id)
    .bind(params.receiver_id)
    .bind(params.subject)
    .bind(params.message)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn mark_read(
    pool: &PgPool,
    id: i64,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE messages SET is_read = TRUE, read_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

use sqlx::PgPool;
use sqlx::{Postgres, Transaction};
use time::PrimitiveDateTime;

use crate::db::models::Progress;

const COLUMNS: &str = "\
    id, user_id, subject_id, total_points, level, streak_days, last_activity, \
    created_at, updated_at";

/// Progress joined with its subject, which the API always nests in full.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProgressDetailRow {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) total_points: i32,
    pub(crate) level: i32,
    pub(crate) streak_days: i32,
    pub(crate) last_activity: Option<PrimitiveDateTime>,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) subject_id: i64,
    pub(crate) subject_name: String,
    pub(crate) subject_description: Option<String>,
    pub(crate) subject_icon: Option<String>,
    pub(crate) subject_color: Option<String>,
    pub(crate) subject_sort_order: i32,
    pub(crate) subject_is_active: bool,
    pub(crate) total_topics: i64,
}

const DETAIL_SELECT: &str = "\
    SELECT p.id,
           p.user_id,
           p.total_points,
           p.level,
           p.streak_days,
           p.last_activity,
           p.updated_at,
           s.id AS subject_id,
           s.name AS subject_name,
           s.description AS subject_description,
           s.icon AS subject_icon,
           s.color AS subject_color,
           s.sort_order AS subject_sort_order,
           s.is_active AS subject_is_active,
           (SELECT COUNT(*) FROM topics t WHERE t.subject_id = s.id) AS total_topics
    FROM progress p
    JOIN subjects s ON s.id = p.subject_id";

pub(crate) async fn list_detailed_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<ProgressDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, ProgressDetailRow>(&format!(
        "{DETAIL_SELECT} WHERE p.user_id = $1 ORDER BY p.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_detailed(
    pool: &PgPool,
    user_id: i64,
    subject_id: i64,
) -> Result<Option<ProgressDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, ProgressDetailRow>(&format!(
        "{DETAIL_SELECT} WHERE p.user_id = $1 AND p.subject_id = $2"
    ))
    .bind(user_id)
    .bind(subject_id)
    .fetch_optional(pool)
    .await
}

/// Creates the row with fresh-start defaults if it does not exist yet.
/// last_activity stays NULL until the first points land, so the streak
/// starts at 1 on that first activity. Safe to race thanks to the unique
/// (user_id, subject_id) constraint.
pub(crate) async fn ensure_row(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: i64,
    subject_id: i64,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO progress (
            user_id, subject_id, total_points, level, streak_days,
            last_activity, created_at, updated_at
        ) VALUES ($1,$2,0,1,0,NULL,$3,$3)
        ON CONFLICT (user_id, subject_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(subject_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Row-locked read for the add-points cycle; the row must already exist.
pub(crate) async fn lock_row(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    subject_id: i64,
) -> Result<Progress, sqlx::Error> {
    sqlx::query_as::<_, Progress>(&format!(
        "SELECT {COLUMNS} FROM progress
         WHERE user_id = $1 AND subject_id = $2
         FOR UPDATE"
    ))
    .bind(user_id)
    .bind(subject_id)
    .fetch_one(&mut **tx)
    .await
}

pub(crate) struct ApplyPoints {
    pub total_points: i32,
    pub level: i32,
    pub streak_days: i32,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn apply_points(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    params: ApplyPoints,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE progress
         SET total_points = $1, level = $2, streak_days = $3,
             last_activity = $4, updated_at = $4
         WHERE id = $5",
    )
    .bind(params.total_points)
    .bind(params.level)
    .bind(params.streak_days)
    .bind(params.now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub(crate) async fn sum_points_by_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(SUM(total_points), 0) FROM progress WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_by_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

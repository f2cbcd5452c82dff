use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Task;
use crate::db::types::{TaskPriority, TaskStatus};

const COLUMNS: &str = "\
    id, tutor_id, student_id, subject_id, title, description, due_date, \
    priority, status, completion_note, completed_at, created_at, updated_at";

/// Whose tasks a listing covers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TaskScope {
    Student(i64),
    Tutor(i64),
}

/// Task joined with tutor/student briefs and the optional subject.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TaskDetailRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<PrimitiveDateTime>,
    pub(crate) priority: TaskPriority,
    pub(crate) status: TaskStatus,
    pub(crate) completion_note: Option<String>,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) tutor_id: i64,
    pub(crate) tutor_first_name: String,
    pub(crate) tutor_last_name: String,
    pub(crate) student_id: i64,
    pub(crate) student_first_name: String,
    pub(crate) student_last_name: String,
    pub(crate) subject_id: Option<i64>,
    pub(crate) subject_name: Option<String>,
    pub(crate) subject_description: Option<String>,
    pub(crate) subject_icon: Option<String>,
    pub(crate) subject_color: Option<String>,
    pub(crate) subject_sort_order: Option<i32>,
    pub(crate) subject_is_active: Option<bool>,
    pub(crate) total_topics: Option<i64>,
}

const DETAIL_SELECT: &str = "\
    SELECT t.id,
           t.title,
           t.description,
           t.due_date,
           t.priority,
           t.status,
           t.completion_note,
           t.completed_at,
           t.created_at,
           t.updated_at,
           tut.id AS tutor_id,
           tut.first_name AS tutor_first_name,
           tut.last_name AS tutor_last_name,
           stu.id AS student_id,
           stu.first_name AS student_first_name,
           stu.last_name AS student_last_name,
           s.id AS subject_id,
           s.name AS subject_name,
           s.description AS subject_description,
           s.icon AS subject_icon,
           s.color AS subject_color,
           s.sort_order AS subject_sort_order,
           s.is_active AS subject_is_active,
           (SELECT COUNT(*) FROM topics tp WHERE tp.subject_id = s.id) AS total_topics
    FROM tasks t
    JOIN users tut ON tut.id = t.tutor_id
    JOIN users stu ON stu.id = t.student_id
    LEFT JOIN subjects s ON s.id = t.subject_id";

/// Flips pending tasks whose deadline has passed to overdue, scoped to the
/// caller. Runs before every listing so clients never see a stale pending.
pub(crate) async fn flip_overdue(
    pool: &PgPool,
    scope: TaskScope,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let (sql, id) = match scope {
        TaskScope::Student(id) => (
            "UPDATE tasks SET status = $1, updated_at = $2
             WHERE student_id = $3 AND status = $4
               AND due_date IS NOT NULL AND due_date < $2",
            id,
        ),
        TaskScope::Tutor(id) => (
            "UPDATE tasks SET status = $1, updated_at = $2
             WHERE tutor_id = $3 AND status = $4
               AND due_date IS NOT NULL AND due_date < $2",
            id,
        ),
    };

    let result = sqlx::query(sql)
        .bind(TaskStatus::Overdue)
        .bind(now)
        .bind(id)
        .bind(TaskStatus::Pending)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_detailed(
    pool: &PgPool,
    scope: TaskScope,
) -> Result<Vec<TaskDetailRow>, sqlx::Error> {
    let (clause, id) = match scope {
        TaskScope::Student(id) => ("WHERE t.student_id = $1", id),
        TaskScope::Tutor(id) => ("WHERE t.tutor_id = $1", id),
    };

    sqlx::query_as::<_, TaskDetailRow>(&format!(
        "{DETAIL_SELECT} {clause} ORDER BY t.due_date ASC, t.id"
    ))
    .bind(id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("SELECT {COLUMNS} FROM tasks WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_detail_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<TaskDetailRow, sqlx::Error> {
    sqlx::query_as::<_, TaskDetailRow>(&format!("{DETAIL_SELECT} WHERE t.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateTask<'a> {
    pub tutor_id: i64,
    pub student_id: i64,
    pub subject_id: Option<i64>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub due_date: Option<PrimitiveDateTime>,
    pub priority: TaskPriority,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateTask<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO tasks (
            tutor_id, student_id, subject_id, title, description, due_date,
            priority, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING id",
    )
    .bind(params.tutor_id)
    .bind(params.student_id)
    .bind(params.subject_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.priority)
    .bind(params.now)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) struct TutorUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<PrimitiveDateTime>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn tutor_update(
    pool: &PgPool,
    id: i64,
    params: TutorUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            due_date = COALESCE($3, due_date),
            priority = COALESCE($4, priority),
            status = COALESCE($5, status),
            updated_at = $6
         WHERE id = $7",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.priority)
    .bind(params.status)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) struct StudentUpdate {
    pub status: Option<TaskStatus>,
    pub completion_note: Option<String>,
    pub completed_at: Option<PrimitiveDateTime>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn student_update(
    pool: &PgPool,
    id: i64,
    params: StudentUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET
            status = COALESCE($1, status),
            completion_note = COALESCE($2, completion_note),
            completed_at = COALESCE($3, completed_at),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.status)
    .bind(params.completion_note)
    .bind(params.completed_at)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

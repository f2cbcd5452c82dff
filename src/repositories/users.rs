use sqlx::PgPool;
use time::{Date, PrimitiveDateTime};

use crate::db::models::User;
use crate::db::types::RoleName;

// Users are always read together with their role and, when one is
// assigned, the tutor's brief columns.
const COLUMNS: &str = "\
    u.id, u.email, u.password_hash, u.first_name, u.last_name, u.phone, \
    u.document_type, u.document_number, u.birth_date, u.institution, \
    u.grade, u.avatar_url, u.is_active, u.role_id, u.tutor_id, \
    u.created_at, u.updated_at, u.last_login, \
    r.name AS role_name, r.description AS role_description, \
    t.first_name AS tutor_first_name, t.last_name AS tutor_last_name, \
    t.email AS tutor_email";

const FROM: &str = "\
    FROM users u \
    JOIN roles r ON r.id = u.role_id \
    LEFT JOIN users t ON t.id = u.tutor_id";

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} {FROM} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} {FROM} WHERE u.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} {FROM} WHERE u.email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn email_exists(pool: &PgPool, email: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub email: &'a str,
    pub password_hash: String,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub document_type: Option<&'a str>,
    pub document_number: Option<&'a str>,
    pub birth_date: Option<Date>,
    pub institution: Option<&'a str>,
    pub grade: Option<&'a str>,
    pub role_id: i64,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (
            email, password_hash, first_name, last_name, phone,
            document_type, document_number, birth_date, institution, grade,
            role_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
        RETURNING id",
    )
    .bind(params.email)
    .bind(params.password_hash)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.document_type)
    .bind(params.document_number)
    .bind(params.birth_date)
    .bind(params.institution)
    .bind(params.grade)
    .bind(params.role_id)
    .bind(params.created_at)
    .bind(params.created_at)
    .fetch_one(pool)
    .await?;

    fetch_one_by_id(pool, id).await
}

pub(crate) async fn update_last_login(
    pool: &PgPool,
    id: i64,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn update_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub institution: Option<String>,
    pub grade: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    id: i64,
    params: UpdateProfile,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            phone = COALESCE($3, phone),
            institution = COALESCE($4, institution),
            grade = COALESCE($5, grade),
            avatar_url = COALESCE($6, avatar_url),
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.institution)
    .bind(params.grade)
    .bind(params.avatar_url)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_tutor(
    pool: &PgPool,
    student_id: i64,
    tutor_id: Option<i64>,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET tutor_id = $1, updated_at = $2 WHERE id = $3")
        .bind(tutor_id)
        .bind(now)
        .bind(student_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn set_role(
    pool: &PgPool,
    user_id: i64,
    role_id: i64,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET role_id = $1, updated_at = $2 WHERE id = $3")
        .bind(role_id)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn set_active(
    pool: &PgPool,
    user_id: i64,
    is_active: bool,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_active = $1, updated_at = $2 WHERE id = $3")
        .bind(is_active)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn list_students(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} {FROM} WHERE r.name = $1 ORDER BY u.id"))
        .bind(RoleName::Estudiante)
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_tutees(pool: &PgPool, tutor_id: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} {FROM} WHERE u.tutor_id = $1 ORDER BY u.id"
    ))
    .bind(tutor_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} {FROM} ORDER BY u.created_at DESC"))
        .fetch_all(pool)
        .await
}

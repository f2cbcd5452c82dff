use sqlx::PgPool;

use crate::db::types::{ExamStatus, RoleName};

/// The teacher dashboard numbers, gathered in one round trip.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TeacherStatsRow {
    pub(crate) total_students: i64,
    pub(crate) total_exams: i64,
    pub(crate) pending_reviews: i64,
    pub(crate) average_score: Option<f64>,
}

pub(crate) async fn teacher_stats(pool: &PgPool) -> Result<TeacherStatsRow, sqlx::Error> {
    sqlx::query_as::<_, TeacherStatsRow>(
        "SELECT
            (SELECT COUNT(*) FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE r.name = $1) AS total_students,
            (SELECT COUNT(*) FROM exams WHERE status = $2) AS total_exams,
            (SELECT COUNT(*) FROM exams e
             WHERE e.status = $2
               AND NOT EXISTS (SELECT 1 FROM grades g WHERE g.exam_id = e.id)
            ) AS pending_reviews,
            (SELECT AVG(percentage) FROM exams WHERE status = $2) AS average_score",
    )
    .bind(RoleName::Estudiante)
    .bind(ExamStatus::Completed)
    .fetch_one(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SystemStatsRow {
    pub(crate) total_users: i64,
    pub(crate) total_students: i64,
    pub(crate) total_teachers: i64,
    pub(crate) total_admins: i64,
    pub(crate) active_users: i64,
    pub(crate) inactive_users: i64,
    pub(crate) total_subjects: i64,
    pub(crate) total_topics: i64,
    pub(crate) total_questions: i64,
    pub(crate) total_exams: i64,
    pub(crate) completed_exams: i64,
    pub(crate) average_score: Option<f64>,
}

pub(crate) async fn system_stats(pool: &PgPool) -> Result<SystemStatsRow, sqlx::Error> {
    sqlx::query_as::<_, SystemStatsRow>(
        "SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM users u
             JOIN roles r ON r.id = u.role_id WHERE r.name = $1) AS total_students,
            (SELECT COUNT(*) FROM users u
             JOIN roles r ON r.id = u.role_id WHERE r.name = $2) AS total_teachers,
            (SELECT COUNT(*) FROM users u
             JOIN roles r ON r.id = u.role_id WHERE r.name = $3) AS total_admins,
            (SELECT COUNT(*) FROM users WHERE is_active = TRUE) AS active_users,
            (SELECT COUNT(*) FROM users WHERE is_active = FALSE) AS inactive_users,
            (SELECT COUNT(*) FROM subjects) AS total_subjects,
            (SELECT COUNT(*) FROM topics) AS total_topics,
            (SELECT COUNT(*) FROM questions) AS total_questions,
            (SELECT COUNT(*) FROM exams) AS total_exams,
            (SELECT COUNT(*) FROM exams WHERE status = $4) AS completed_exams,
            (SELECT AVG(percentage) FROM exams WHERE status = $4) AS average_score",
    )
    .bind(RoleName::Estudiante)
    .bind(RoleName::Docente)
    .bind(RoleName::Admin)
    .bind(ExamStatus::Completed)
    .fetch_one(pool)
    .await
}

/// Completed-exam aggregates per student, for the admin user directory.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentExamAggRow {
    pub(crate) student_id: i64,
    pub(crate) total_exams: i64,
    pub(crate) average_score: Option<f64>,
}

pub(crate) async fn exam_aggregates_by_student(
    pool: &PgPool,
) -> Result<Vec<StudentExamAggRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentExamAggRow>(
        "SELECT student_id,
                COUNT(*) AS total_exams,
                AVG(percentage) AS average_score
         FROM exams
         WHERE status = $1
         GROUP BY student_id",
    )
    .bind(ExamStatus::Completed)
    .fetch_all(pool)
    .await
}

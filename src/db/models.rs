use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{
    AnswerChoice, Difficulty, ExamStatus, ExamType, GradeStatus, RoleName, TaskPriority,
    TaskStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Role {
    pub(crate) id: i64,
    pub(crate) name: RoleName,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Always loaded with its role joined in (`role_name`, `role_description`)
/// and, when a tutor is assigned, the tutor's brief columns from a
/// LEFT JOIN on `users` itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) document_type: Option<String>,
    pub(crate) document_number: Option<String>,
    pub(crate) birth_date: Option<Date>,
    pub(crate) institution: Option<String>,
    pub(crate) grade: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) role_id: i64,
    pub(crate) tutor_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) last_login: Option<PrimitiveDateTime>,
    pub(crate) role_name: RoleName,
    pub(crate) role_description: Option<String>,
    pub(crate) tutor_first_name: Option<String>,
    pub(crate) tutor_last_name: Option<String>,
    pub(crate) tutor_email: Option<String>,
}

impl User {
    pub(crate) fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub(crate) fn is_student(&self) -> bool {
        self.role_name == RoleName::Estudiante
    }

    pub(crate) fn is_teacher(&self) -> bool {
        self.role_name == RoleName::Docente
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.role_name == RoleName::Admin
    }
}

/// `total_topics` is a computed column (subquery count over `topics`),
/// selected by every subject query because the API always reports it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Subject {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) sort_order: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) total_topics: i64,
}

/// `total_questions` is a computed column, same arrangement as
/// [`Subject::total_topics`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Topic {
    pub(crate) id: i64,
    pub(crate) subject_id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) sort_order: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) total_questions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) topic_id: i64,
    pub(crate) question_text: String,
    pub(crate) question_type: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) correct_answer: AnswerChoice,
    pub(crate) explanation: Option<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) image_url: Option<String>,
    pub(crate) points: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) exam_type: ExamType,
    pub(crate) title: String,
    pub(crate) total_questions: i32,
    pub(crate) time_limit: i32,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) status: ExamStatus,
    pub(crate) score: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamAnswer {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) question_id: i64,
    pub(crate) user_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
    pub(crate) time_spent: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Progress {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) total_points: i32,
    pub(crate) level: i32,
    pub(crate) streak_days: i32,
    pub(crate) last_activity: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Notification {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) kind: String,
    pub(crate) is_read: bool,
    pub(crate) link: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Grade {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) score: f64,
    pub(crate) feedback: Option<String>,
    pub(crate) strengths: Option<String>,
    pub(crate) improvements: Option<String>,
    pub(crate) status: GradeStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Message {
    pub(crate) id: i64,
    pub(crate) sender_id: i64,
    pub(crate) receiver_id: i64,
    pub(crate) subject: Option<String>,
    pub(crate) message: String,
    pub(crate) is_read: bool,
    pub(crate) read_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Task {
    pub(crate) id: i64,
    pub(crate) tutor_id: i64,
    pub(crate) student_id: i64,
    pub(crate) subject_id: Option<i64>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<PrimitiveDateTime>,
    pub(crate) priority: TaskPriority,
    pub(crate) status: TaskStatus,
    pub(crate) completion_note: Option<String>,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Grade;
use crate::db::types::GradeStatus;
use crate::repositories::stats::SystemStatsRow;
use crate::schemas::exam::ExamResponse;
use crate::schemas::progress::ProgressResponse;
use crate::schemas::user::UserResponse;
use crate::services::scoring::round2;

#[derive(Debug, Deserialize)]
pub(crate) struct GradeExamRequest {
    #[serde(default)]
    pub(crate) exam_id: Option<i64>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
    #[serde(default)]
    pub(crate) strengths: Option<String>,
    #[serde(default)]
    pub(crate) improvements: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangeRoleRequest {
    #[serde(default)]
    pub(crate) role_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeResponse {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) score: f64,
    pub(crate) feedback: Option<String>,
    pub(crate) strengths: Option<String>,
    pub(crate) improvements: Option<String>,
    pub(crate) status: GradeStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl GradeResponse {
    pub(crate) fn from_db(grade: Grade) -> Self {
        Self {
            id: grade.id,
            exam_id: grade.exam_id,
            teacher_id: grade.teacher_id,
            score: grade.score,
            feedback: grade.feedback,
            strengths: grade.strengths,
            improvements: grade.improvements,
            status: grade.status,
            created_at: format_primitive(grade.created_at),
            updated_at: format_primitive(grade.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentStats {
    pub(crate) total_exams: i64,
    pub(crate) average_score: f64,
}

/// Directory listing entry. Students carry exam aggregates, other roles do
/// not get a `stats` key at all.
#[derive(Debug, Serialize)]
pub(crate) struct UserWithStats {
    #[serde(flatten)]
    pub(crate) user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stats: Option<StudentStats>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserDetailResponse {
    #[serde(flatten)]
    pub(crate) user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exams: Option<Vec<ExamResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) progress: Option<Vec<ProgressResponse>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserTotals {
    pub(crate) total: i64,
    pub(crate) students: i64,
    pub(crate) teachers: i64,
    pub(crate) admins: i64,
    pub(crate) active: i64,
    pub(crate) inactive: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentTotals {
    pub(crate) subjects: i64,
    pub(crate) topics: i64,
    pub(crate) questions: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamTotals {
    pub(crate) total: i64,
    pub(crate) completed: i64,
    pub(crate) completion_rate: f64,
    pub(crate) average_score: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemStats {
    pub(crate) users: UserTotals,
    pub(crate) content: ContentTotals,
    pub(crate) exams: ExamTotals,
}

impl SystemStats {
    pub(crate) fn from_row(row: SystemStatsRow) -> Self {
        Self {
            users: UserTotals {
                total: row.total_users,
                students: row.total_students,
                teachers: row.total_teachers,
                admins: row.total_admins,
                active: row.active_users,
                inactive: row.inactive_users,
            },
            content: ContentTotals {
                subjects: row.total_subjects,
                topics: row.total_topics,
                questions: row.total_questions,
            },
            exams: ExamTotals {
                total: row.total_exams,
                completed: row.completed_exams,
                completion_rate: if row.total_exams > 0 {
                    round2(100.0 * row.completed_exams as f64 / row.total_exams as f64)
                } else {
                    0.0
                },
                average_score: row.average_score.map(round2).unwrap_or(0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_stats_groups_counters() {
        let row = SystemStatsRow {
            total_users: 20,
            total_students: 15,
            total_teachers: 4,
            total_admins: 1,
            active_users: 18,
            inactive_users: 2,
            total_subjects: 5,
            total_topics: 30,
            total_questions: 400,
            total_exams: 50,
            completed_exams: 42,
            average_score: Some(71.236),
        };

        let value = serde_json::to_value(SystemStats::from_row(row)).unwrap();
        assert_eq!(value["users"]["students"], 15);
        assert_eq!(value["content"]["questions"], 400);
        assert_eq!(value["exams"]["average_score"], 71.24);
        assert_eq!(value["exams"]["completion_rate"], 84.0);
    }

    #[test]
    fn average_score_defaults_to_zero_without_completed_exams() {
        let row = SystemStatsRow {
            total_users: 1,
            total_students: 0,
            total_teachers: 0,
            total_admins: 1,
            active_users: 1,
            inactive_users: 0,
            total_subjects: 0,
            total_topics: 0,
            total_questions: 0,
            total_exams: 0,
            completed_exams: 0,
            average_score: None,
        };

        let value = serde_json::to_value(SystemStats::from_row(row)).unwrap();
        assert_eq!(value["exams"]["average_score"], 0.0);
        assert_eq!(value["exams"]["completion_rate"], 0.0);
    }
}

use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};

use crate::core::time::{format_primitive, to_primitive_utc};
use crate::db::types::{TaskPriority, TaskStatus};
use crate::repositories::messages::MessageDetailRow;
use crate::repositories::tasks::TaskDetailRow;
use crate::schemas::subject::SubjectResponse;
use crate::schemas::user::UserBrief;

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessageRequest {
    #[serde(default)]
    pub(crate) receiver_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskRequest {
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    pub(crate) priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateTaskRequest {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    pub(crate) priority: Option<TaskPriority>,
    #[serde(default)]
    pub(crate) status: Option<TaskStatus>,
    #[serde(default)]
    pub(crate) completion_note: Option<String>,
}

/// Due dates arrive as strings so the handlers can answer malformed input in
/// Spanish instead of a serde rejection. Accepts RFC 3339 plus the shorter
/// forms that datetime-local inputs send.
pub(crate) fn parse_due_date(raw: &str) -> Option<PrimitiveDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(to_primitive_utc(value));
    }

    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value);
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value);
    }

    None
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) id: i64,
    pub(crate) sender: UserBrief,
    pub(crate) receiver: UserBrief,
    pub(crate) subject: Option<String>,
    pub(crate) message: String,
    pub(crate) is_read: bool,
    pub(crate) read_at: Option<String>,
    pub(crate) created_at: String,
}

impl MessageResponse {
    pub(crate) fn from_row(row: MessageDetailRow) -> Self {
        Self {
            id: row.id,
            sender: UserBrief {
                id: row.sender_id,
                full_name: format!("{} {}", row.sender_first_name, row.sender_last_name),
                email: row.sender_email,
            },
            receiver: UserBrief {
                id: row.receiver_id,
                full_name: format!("{} {}", row.receiver_first_name, row.receiver_last_name),
                email: row.receiver_email,
            },
            subject: row.subject,
            message: row.message,
            is_read: row.is_read,
            read_at: row.read_at.map(format_primitive),
            created_at: format_primitive(row.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskParty {
    pub(crate) id: i64,
    pub(crate) full_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskResponse {
    pub(crate) id: i64,
    pub(crate) tutor: TaskParty,
    pub(crate) student: TaskParty,
    pub(crate) subject: Option<SubjectResponse>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<String>,
    pub(crate) priority: TaskPriority,
    pub(crate) status: TaskStatus,
    pub(crate) completion_note: Option<String>,
    pub(crate) completed_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl TaskResponse {
    pub(crate) fn from_row(row: TaskDetailRow) -> Self {
        let subject = match (row.subject_id, row.subject_name) {
            (Some(id), Some(name)) => Some(SubjectResponse {
                id,
                name,
                description: row.subject_description,
                icon: row.subject_icon,
                color: row.subject_color,
                sort_order: row.subject_sort_order.unwrap_or(0),
                is_active: row.subject_is_active.unwrap_or(false),
                total_topics: row.total_topics.unwrap_or(0),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            tutor: TaskParty {
                id: row.tutor_id,
                full_name: format!("{} {}", row.tutor_first_name, row.tutor_last_name),
            },
            student: TaskParty {
                id: row.student_id,
                full_name: format!("{} {}", row.student_first_name, row.student_last_name),
            },
            subject,
            title: row.title,
            description: row.description,
            due_date: row.due_date.map(format_primitive),
            priority: row.priority,
            status: row.status,
            completion_note: row.completion_note,
            completed_at: row.completed_at.map(format_primitive),
            created_at: format_primitive(row.created_at),
            updated_at: format_primitive(row.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn due_date_accepts_datetime_local_forms() {
        assert_eq!(
            parse_due_date("2026-03-01T08:30"),
            Some(datetime!(2026-03-01 08:30:00))
        );
        assert_eq!(
            parse_due_date("2026-03-01T08:30:15"),
            Some(datetime!(2026-03-01 08:30:15))
        );
        assert_eq!(
            parse_due_date("2026-03-01T08:30:00Z"),
            Some(datetime!(2026-03-01 08:30:00))
        );
    }

    #[test]
    fn due_date_normalizes_offsets_to_utc() {
        assert_eq!(
            parse_due_date("2026-03-01T08:30:00-05:00"),
            Some(datetime!(2026-03-01 13:30:00))
        );
    }

    #[test]
    fn due_date_rejects_garbage() {
        assert_eq!(parse_due_date("mañana"), None);
        assert_eq!(parse_due_date("2026-03-01 08:30"), None);
    }

    #[test]
    fn task_without_subject_serializes_null() {
        let row = TaskDetailRow {
            id: 2,
            title: "Repasar fracciones".to_owned(),
            description: None,
            due_date: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            completion_note: None,
            completed_at: None,
            created_at: datetime!(2026-02-05 11:00:00),
            updated_at: datetime!(2026-02-05 11:00:00),
            tutor_id: 1,
            tutor_first_name: "Laura".to_owned(),
            tutor_last_name: "Gómez".to_owned(),
            student_id: 9,
            student_first_name: "Andrés".to_owned(),
            student_last_name: "Pardo".to_owned(),
            subject_id: None,
            subject_name: None,
            subject_description: None,
            subject_icon: None,
            subject_color: None,
            subject_sort_order: None,
            subject_is_active: None,
            total_topics: None,
        };

        let value = serde_json::to_value(TaskResponse::from_row(row)).unwrap();
        assert_eq!(value["subject"], serde_json::Value::Null);
        assert_eq!(value["tutor"]["full_name"], "Laura Gómez");
        assert_eq!(value["student"]["id"], 9);
    }
}

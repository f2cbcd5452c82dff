use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Notification;
use crate::repositories::progress::ProgressDetailRow;
use crate::schemas::subject::SubjectResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct AddPointsRequest {
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) points: Option<i32>,
}

/// Progress rows always travel with their subject embedded, never as a bare
/// foreign key.
#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) subject: SubjectResponse,
    pub(crate) total_points: i32,
    pub(crate) level: i32,
    pub(crate) streak_days: i32,
    pub(crate) last_activity: Option<String>,
    pub(crate) updated_at: String,
}

impl ProgressResponse {
    pub(crate) fn from_row(row: ProgressDetailRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            subject: SubjectResponse {
                id: row.subject_id,
                name: row.subject_name,
                description: row.subject_description,
                icon: row.subject_icon,
                color: row.subject_color,
                sort_order: row.subject_sort_order,
                is_active: row.subject_is_active,
                total_topics: row.total_topics,
            },
            total_points: row.total_points,
            level: row.level,
            streak_days: row.streak_days,
            last_activity: row.last_activity.map(format_primitive),
            updated_at: format_primitive(row.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) title: String,
    pub(crate) message: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) is_read: bool,
    pub(crate) link: Option<String>,
    pub(crate) created_at: String,
}

impl NotificationResponse {
    pub(crate) fn from_db(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: notification.is_read,
            link: notification.link,
            created_at: format_primitive(notification.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn progress_nests_the_subject() {
        let row = ProgressDetailRow {
            id: 4,
            user_id: 9,
            total_points: 250,
            level: 3,
            streak_days: 5,
            last_activity: Some(datetime!(2026-02-03 09:30:00)),
            updated_at: datetime!(2026-02-03 09:30:00),
            subject_id: 1,
            subject_name: "Matemáticas".to_owned(),
            subject_description: None,
            subject_icon: Some("calculator".to_owned()),
            subject_color: None,
            subject_sort_order: 1,
            subject_is_active: true,
            total_topics: 12,
        };

        let value = serde_json::to_value(ProgressResponse::from_row(row)).unwrap();
        assert_eq!(value["subject"]["name"], "Matemáticas");
        assert_eq!(value["subject"]["order"], 1);
        assert!(value.get("subject_id").is_none());
        assert_eq!(value["streak_days"], 5);
    }

    #[test]
    fn notification_kind_serializes_as_type() {
        let notification = Notification {
            id: 1,
            user_id: 9,
            title: "Examen calificado".to_owned(),
            message: "Tu examen fue calificado".to_owned(),
            kind: "exam".to_owned(),
            is_read: false,
            link: Some("/exams/7".to_owned()),
            created_at: datetime!(2026-02-03 10:00:00),
        };

        let value = serde_json::to_value(NotificationResponse::from_db(notification)).unwrap();
        assert_eq!(value["type"], "exam");
        assert!(value.get("kind").is_none());
    }
}

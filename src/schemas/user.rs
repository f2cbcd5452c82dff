use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::RoleName;

#[derive(Debug, Serialize)]
pub(crate) struct RoleResponse {
    pub(crate) id: i64,
    pub(crate) name: RoleName,
    pub(crate) description: Option<String>,
}

/// Short user reference nested inside other payloads.
#[derive(Debug, Serialize)]
pub(crate) struct UserBrief {
    pub(crate) id: i64,
    pub(crate) full_name: String,
    pub(crate) email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) full_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) document_type: Option<String>,
    pub(crate) document_number: Option<String>,
    pub(crate) birth_date: Option<String>,
    pub(crate) institution: Option<String>,
    pub(crate) grade: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) role: RoleResponse,
    pub(crate) tutor_id: Option<i64>,
    pub(crate) tutor: Option<UserBrief>,
    pub(crate) created_at: String,
    pub(crate) last_login: Option<String>,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        let full_name = user.full_name();
        let tutor = match (user.tutor_id, user.tutor_first_name, user.tutor_last_name) {
            (Some(id), Some(first), Some(last)) => Some(UserBrief {
                id,
                full_name: format!("{first} {last}"),
                email: user.tutor_email.unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            phone: user.phone,
            document_type: user.document_type,
            document_number: user.document_number,
            birth_date: user.birth_date.map(format_date),
            institution: user.institution,
            grade: user.grade,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            role: RoleResponse {
                id: user.role_id,
                name: user.role_name,
                description: user.role_description,
            },
            tutor_id: user.tutor_id,
            tutor,
            created_at: format_primitive(user.created_at),
            last_login: user.last_login.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileStats {
    pub(crate) total_exams: i64,
    pub(crate) total_points: i64,
    pub(crate) subjects_in_progress: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    #[serde(flatten)]
    pub(crate) user: UserResponse,
    pub(crate) stats: ProfileStats,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    pub(crate) institution: Option<String>,
    #[serde(default)]
    pub(crate) grade: Option<String>,
    #[serde(default)]
    pub(crate) avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TutorAssignmentRequest {
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
}

fn format_date(value: Date) -> String {
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_is_iso() {
        let date = Date::from_calendar_date(2008, time::Month::November, 3).unwrap();
        assert_eq!(format_date(date), "2008-11-03");
    }
}

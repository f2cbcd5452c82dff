use serde::{Deserialize, Serialize};
use sqlx::Type;

// Status-like columns are TEXT in Postgres; the derives below map them to
// the renamed variant strings on both encode and decode.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum RoleName {
    Estudiante,
    Docente,
    Admin,
}

impl RoleName {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RoleName::Estudiante => "estudiante",
            RoleName::Docente => "docente",
            RoleName::Admin => "admin",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "estudiante" => Some(RoleName::Estudiante),
            "docente" => Some(RoleName::Docente),
            "admin" => Some(RoleName::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum ExamType {
    Practice,
    Simulacro,
    Exam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub(crate) enum ExamStatus {
    InProgress,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    Facil,
    Medio,
    Dificil,
}

/// One of the four option keys of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub(crate) enum AnswerChoice {
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            AnswerChoice::A => "A",
            AnswerChoice::B => "B",
            AnswerChoice::C => "C",
            AnswerChoice::D => "D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub(crate) enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub(crate) enum GradeStatus {
    Pending,
    Reviewed,
    Approved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_name_round_trips_through_parse() {
        for role in [RoleName::Estudiante, RoleName::Docente, RoleName::Admin] {
            assert_eq!(RoleName::parse(role.as_str()), Some(role));
        }
        assert_eq!(RoleName::parse("superuser"), None);
    }

    #[test]
    fn exam_status_serializes_snake_case() {
        let json = serde_json::to_string(&ExamStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn answer_choice_keeps_uppercase_letters() {
        let json = serde_json::to_string(&AnswerChoice::C).unwrap();
        assert_eq!(json, "\"C\"");
        assert_eq!(AnswerChoice::C.as_str(), "C");
    }
}

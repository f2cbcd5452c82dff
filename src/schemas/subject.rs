use serde::{Deserialize, Serialize};

use crate::db::models::{Question, Subject, Topic};
use crate::db::types::{AnswerChoice, Difficulty};

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) color: Option<String>,
    #[serde(rename = "order")]
    pub(crate) sort_order: i32,
    pub(crate) is_active: bool,
    pub(crate) total_topics: i64,
}

impl SubjectResponse {
    pub(crate) fn from_db(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            description: subject.description,
            icon: subject.icon,
            color: subject.color,
            sort_order: subject.sort_order,
            is_active: subject.is_active,
            total_topics: subject.total_topics,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectDetailResponse {
    #[serde(flatten)]
    pub(crate) subject: SubjectResponse,
    pub(crate) topics: Vec<TopicResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) id: i64,
    pub(crate) subject_id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) difficulty: Difficulty,
    #[serde(rename = "order")]
    pub(crate) sort_order: i32,
    pub(crate) is_active: bool,
    pub(crate) total_questions: i64,
}

impl TopicResponse {
    pub(crate) fn from_db(topic: Topic) -> Self {
        Self {
            id: topic.id,
            subject_id: topic.subject_id,
            name: topic.name,
            description: topic.description,
            difficulty: topic.difficulty,
            sort_order: topic.sort_order,
            is_active: topic.is_active,
            total_questions: topic.total_questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionOptions {
    #[serde(rename = "A")]
    pub(crate) a: String,
    #[serde(rename = "B")]
    pub(crate) b: String,
    #[serde(rename = "C")]
    pub(crate) c: String,
    #[serde(rename = "D")]
    pub(crate) d: String,
}

/// `correct_answer` and `explanation` are only present on teacher-facing
/// and post-submission payloads; for an exam in flight both keys are
/// omitted entirely. The nested Option keeps "absent" and "null" apart.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) topic_id: i64,
    pub(crate) question_text: String,
    pub(crate) question_type: String,
    pub(crate) options: QuestionOptions,
    pub(crate) difficulty: Difficulty,
    pub(crate) image_url: Option<String>,
    pub(crate) points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) correct_answer: Option<AnswerChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) explanation: Option<Option<String>>,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question, include_answer: bool) -> Self {
        Self {
            id: question.id,
            topic_id: question.topic_id,
            question_text: question.question_text,
            question_type: question.question_type,
            options: QuestionOptions {
                a: question.option_a,
                b: question.option_b,
                c: question.option_c,
                d: question.option_d,
            },
            difficulty: question.difficulty,
            image_url: question.image_url,
            points: question.points,
            correct_answer: include_answer.then_some(question.correct_answer),
            explanation: include_answer.then_some(question.explanation),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
    #[serde(default)]
    pub(crate) difficulty: Option<Difficulty>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn question() -> Question {
        Question {
            id: 11,
            topic_id: 3,
            question_text: "¿Cuánto es 2 + 2?".to_string(),
            question_type: "multiple_choice".to_string(),
            option_a: "3".to_string(),
            option_b: "4".to_string(),
            option_c: "5".to_string(),
            option_d: "22".to_string(),
            correct_answer: AnswerChoice::B,
            explanation: Some("Suma básica".to_string()),
            difficulty: Difficulty::Facil,
            image_url: None,
            points: 10,
            is_active: true,
            created_at: datetime!(2026-01-05 08:00),
        }
    }

    #[test]
    fn answer_keys_are_withheld_by_default() {
        let value =
            serde_json::to_value(QuestionResponse::from_db(question(), false)).unwrap();
        assert!(value.get("correct_answer").is_none());
        assert!(value.get("explanation").is_none());
        assert_eq!(value["options"]["B"], "4");
    }

    #[test]
    fn answer_keys_appear_when_included() {
        let value =
            serde_json::to_value(QuestionResponse::from_db(question(), true)).unwrap();
        assert_eq!(value["correct_answer"], "B");
        assert_eq!(value["explanation"], "Suma básica");
    }
}

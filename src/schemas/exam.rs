use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Exam;
use crate::db::types::{Difficulty, ExamStatus, ExamType};
use crate::repositories::exam_answers::AnswerDetailRow;
use crate::schemas::subject::{QuestionOptions, QuestionResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct ExamCreateRequest {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) topic_id: Option<i64>,
    #[serde(default)]
    pub(crate) exam_type: Option<ExamType>,
    #[serde(default)]
    pub(crate) total_questions: Option<i32>,
    #[serde(default)]
    pub(crate) time_limit: Option<i32>,
    #[serde(default)]
    pub(crate) difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAnswer {
    pub(crate) question_id: i64,
    #[serde(default)]
    pub(crate) answer: Option<String>,
    #[serde(default)]
    pub(crate) time_spent: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitExamRequest {
    #[serde(default)]
    pub(crate) answers: Vec<SubmitAnswer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExamListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
    #[serde(default)]
    pub(crate) status: Option<ExamStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) exam_type: ExamType,
    pub(crate) subject_id: i64,
    pub(crate) title: String,
    pub(crate) total_questions: i32,
    pub(crate) time_limit: i32,
    pub(crate) start_time: String,
    pub(crate) end_time: Option<String>,
    pub(crate) status: ExamStatus,
    pub(crate) score: Option<f64>,
    pub(crate) percentage: Option<f64>,
    pub(crate) created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) answers: Option<Vec<ExamAnswerResponse>>,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            id: exam.id,
            student_id: exam.student_id,
            exam_type: exam.exam_type,
            subject_id: exam.subject_id,
            title: exam.title,
            total_questions: exam.total_questions,
            time_limit: exam.time_limit,
            start_time: format_primitive(exam.start_time),
            end_time: exam.end_time.map(format_primitive),
            status: exam.status,
            score: exam.score,
            percentage: exam.percentage,
            created_at: format_primitive(exam.created_at),
            answers: None,
        }
    }

    pub(crate) fn with_answers(exam: Exam, answers: Vec<AnswerDetailRow>) -> Self {
        let mut response = Self::from_db(exam);
        response.answers = Some(answers.into_iter().map(ExamAnswerResponse::from_row).collect());
        response
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamAnswerResponse {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) question_id: i64,
    pub(crate) user_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
    pub(crate) time_spent: Option<i32>,
    pub(crate) question: QuestionResponse,
}

impl ExamAnswerResponse {
    pub(crate) fn from_row(row: AnswerDetailRow) -> Self {
        Self {
            id: row.id,
            exam_id: row.exam_id,
            question_id: row.question_id,
            user_answer: row.user_answer,
            is_correct: row.is_correct,
            points_earned: row.points_earned,
            time_spent: row.time_spent,
            question: QuestionResponse {
                id: row.question_id,
                topic_id: row.topic_id,
                question_text: row.question_text,
                question_type: row.question_type,
                options: QuestionOptions {
                    a: row.option_a,
                    b: row.option_b,
                    c: row.option_c,
                    d: row.option_d,
                },
                difficulty: row.difficulty,
                image_url: row.image_url,
                points: row.points,
                correct_answer: Some(row.correct_answer),
                explanation: Some(row.explanation),
            },
        }
    }
}

/// Summary block returned right after a submission.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitResults {
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i64,
    pub(crate) score: i64,
    pub(crate) percentage: f64,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::db::types::AnswerChoice;

    fn exam() -> Exam {
        Exam {
            id: 7,
            student_id: 3,
            exam_type: ExamType::Practice,
            subject_id: 1,
            title: "Simulacro de Matemáticas".to_owned(),
            total_questions: 2,
            time_limit: 60,
            start_time: datetime!(2026-02-01 14:00:00),
            end_time: None,
            status: ExamStatus::InProgress,
            score: None,
            percentage: None,
            created_at: datetime!(2026-02-01 14:00:00),
        }
    }

    #[test]
    fn in_progress_exam_omits_answers() {
        let value = serde_json::to_value(ExamResponse::from_db(exam())).unwrap();
        assert!(value.get("answers").is_none());
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["end_time"], serde_json::Value::Null);
    }

    #[test]
    fn answers_carry_the_question_with_its_key() {
        let row = AnswerDetailRow {
            id: 11,
            exam_id: 7,
            question_id: 42,
            user_answer: Some("B".to_owned()),
            is_correct: true,
            points_earned: 10,
            time_spent: Some(35),
            topic_id: 5,
            question_text: "¿Cuánto es 2 + 2?".to_owned(),
            question_type: "multiple_choice".to_owned(),
            option_a: "3".to_owned(),
            option_b: "4".to_owned(),
            option_c: "5".to_owned(),
            option_d: "6".to_owned(),
            correct_answer: AnswerChoice::B,
            explanation: None,
            difficulty: Difficulty::Facil,
            image_url: None,
            points: 10,
        };

        let mut completed = exam();
        completed.status = ExamStatus::Completed;
        let value = serde_json::to_value(ExamResponse::with_answers(completed, vec![row])).unwrap();
        let answer = &value["answers"][0];
        assert_eq!(answer["question"]["correct_answer"], "B");
        assert_eq!(answer["question"]["options"]["B"], "4");
        assert_eq!(answer["user_answer"], "B");
    }

    #[test]
    fn submit_answers_default_to_empty() {
        let request: SubmitExamRequest = serde_json::from_str("{}").unwrap();
        assert!(request.answers.is_empty());
    }
}

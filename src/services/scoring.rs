use crate::db::types::AnswerChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnswerOutcome {
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
}

/// Compares a submitted answer against the question's correct choice.
///
/// The comparison is exact: answers are stored as single letters and a
/// lowercase or padded submission does not match. A missing submission is
/// always incorrect.
pub(crate) fn evaluate_answer(
    correct: AnswerChoice,
    submitted: Option<&str>,
    question_points: i32,
) -> AnswerOutcome {
    let is_correct = submitted == Some(correct.as_str());
    AnswerOutcome { is_correct, points_earned: if is_correct { question_points } else { 0 } }
}

/// Share of correct answers as a percentage. An exam with no questions
/// scores 0 rather than dividing by zero.
pub(crate) fn percentage(correct_answers: i64, total_questions: i64) -> f64 {
    if total_questions <= 0 {
        return 0.0;
    }
    correct_answers as f64 / total_questions as f64 * 100.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_earns_points() {
        let outcome = evaluate_answer(AnswerChoice::B, Some("B"), 15);
        assert!(outcome.is_correct);
        assert_eq!(outcome.points_earned, 15);
    }

    #[test]
    fn wrong_answer_earns_nothing() {
        let outcome = evaluate_answer(AnswerChoice::A, Some("C"), 10);
        assert!(!outcome.is_correct);
        assert_eq!(outcome.points_earned, 0);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let outcome = evaluate_answer(AnswerChoice::D, Some("d"), 10);
        assert!(!outcome.is_correct);
    }

    #[test]
    fn missing_answer_is_incorrect() {
        let outcome = evaluate_answer(AnswerChoice::A, None, 10);
        assert!(!outcome.is_correct);
        assert_eq!(outcome.points_earned, 0);
    }

    #[test]
    fn percentage_of_empty_exam_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert!(!percentage(0, 0).is_nan());
    }

    #[test]
    fn percentage_is_proportional() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(10, 10), 100.0);
        assert_eq!(percentage(0, 7), 0.0);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(percentage(1, 3)), 33.33);
        assert_eq!(round2(percentage(2, 3)), 66.67);
        assert_eq!(round2(50.0), 50.0);
    }
}

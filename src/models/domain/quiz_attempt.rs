use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::grading_service::GradedQuiz;

/// Immutable graded outcome of a session submission or a direct attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub answers: Vec<String>,
    pub correct_answers: Vec<String>,
    pub question_results: Vec<QuestionResult>,
    pub score: i32,
    pub total_questions: i32,
    pub earned_points: i32,
    pub total_possible_points: i32,
    pub points_percentage: f64,
    pub percentage: f64,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_minutes: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionResult {
    pub question_number: i32,
    pub question_text: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
    pub explanation: Option<String>,
}

impl QuizAttempt {
    pub fn from_grading(
        quiz_id: &str,
        user_id: &str,
        session_id: Option<&str>,
        graded: GradedQuiz,
        time_taken_minutes: Option<f64>,
    ) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.map(str::to_string),
            answers: graded.answers,
            correct_answers: graded.correct_answers,
            question_results: graded.question_results,
            score: graded.score,
            total_questions: graded.total_questions,
            earned_points: graded.earned_points,
            total_possible_points: graded.total_possible_points,
            points_percentage: graded.points_percentage,
            percentage: graded.percentage,
            passed: graded.passed,
            attempted_at: Utc::now(),
            time_taken_minutes,
        }
    }
}

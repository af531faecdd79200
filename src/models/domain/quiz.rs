use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MIN_PASS_PERCENTAGE: f64 = 60.0;

fn default_min_pass_percentage() -> f64 {
    DEFAULT_MIN_PASS_PERCENTAGE
}

fn default_points() -> i32 {
    1
}

/// Quiz document owned by the catalog. The session core only reads it, apart
/// from the denormalized statistics fields.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub time_limit_minutes: Option<i32>,
    #[serde(default = "default_min_pass_percentage")]
    pub min_pass_percentage: f64,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub total_attempts: i64,
    #[serde(default)]
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    OpenEnded,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub question: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub expected_answers: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Quiz {
    pub fn new(title: &str, questions: Vec<Question>) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            created_by: None,
            questions,
            time_limit_minutes: None,
            min_pass_percentage: DEFAULT_MIN_PASS_PERCENTAGE,
            is_draft: false,
            total_attempts: 0,
            average_score: 0.0,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn with_time_limit(mut self, minutes: i32) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    pub fn as_draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    pub fn is_published(&self) -> bool {
        !self.is_draft
    }

    pub fn question_count(&self) -> i32 {
        self.questions.len() as i32
    }
}

impl Question {
    pub fn multiple_choice(question: &str, options: &[(&str, bool)], points: i32) -> Self {
        Question {
            question: question.to_string(),
            question_type: QuestionType::MultipleChoice,
            options: options
                .iter()
                .map(|(text, is_correct)| QuestionOption {
                    text: text.to_string(),
                    is_correct: *is_correct,
                })
                .collect(),
            expected_answers: Vec::new(),
            keywords: Vec::new(),
            case_sensitive: false,
            points,
            explanation: None,
        }
    }

    pub fn open_ended(question: &str, expected_answers: &[&str], keywords: &[&str], points: i32) -> Self {
        Question {
            question: question.to_string(),
            question_type: QuestionType::OpenEnded,
            options: Vec::new(),
            expected_answers: expected_answers.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            case_sensitive: false,
            points,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

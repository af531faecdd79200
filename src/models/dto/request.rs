use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct StartQuizSessionRequest {
    #[validate(length(min = 1, message = "quiz_id is required"))]
    pub quiz_id: String,

    /// Overrides the quiz's own time limit when present.
    #[validate(range(min = 1, max = 1440))]
    pub time_limit_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct UpdateQuizSessionRequest {
    #[validate(range(min = 0))]
    pub current_question_index: i32,

    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitQuizAttemptRequest {
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Query string of `GET /my-quiz-attempts`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttemptQueryParams {
    pub quiz_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl AttemptQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::{QuizAttempt, QuizSession, SessionStatus};

/// Acknowledgement returned by progress, pause and resume.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SessionAckResponse {
    pub message: String,
    pub session_id: String,
    pub status: SessionStatus,
    pub time_remaining_seconds: Option<i64>,
}

impl SessionAckResponse {
    pub fn new(message: &str, session: &QuizSession) -> Self {
        Self {
            message: message.to_string(),
            session_id: session.id.clone(),
            status: session.status,
            time_remaining_seconds: session.time_remaining_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(offset: i64, limit: i64, total: i64) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizAttemptPage {
    pub items: Vec<QuizAttempt>,
    pub pagination: PaginationMetadata,
}

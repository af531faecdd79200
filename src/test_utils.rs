#[cfg(test)]
pub mod fixtures {
    use crate::auth::Claims;
    use crate::models::domain::{Question, Quiz, QuizSession, SessionStatus, UserRole};

    /// Two-question quiz whose correct answers are "8" and "Paris".
    pub fn timed_quiz(time_limit_minutes: i32) -> Quiz {
        let mut quiz = untimed_quiz().with_time_limit(time_limit_minutes);
        quiz.id = "quiz-timed".to_string();
        quiz
    }

    pub fn untimed_quiz() -> Quiz {
        let mut quiz = Quiz::new(
            "General knowledge",
            vec![
                Question::multiple_choice("What is 5 + 3?", &[("7", false), ("8", true)], 1)
                    .with_explanation("5 + 3 = 8"),
                Question::multiple_choice(
                    "What is the capital of France?",
                    &[("London", false), ("Paris", true), ("Rome", false)],
                    1,
                ),
            ],
        );
        quiz.id = "quiz-untimed".to_string();
        quiz
    }

    pub fn open_ended_quiz() -> Quiz {
        let mut quiz = Quiz::new(
            "Chemistry",
            vec![Question::open_ended("What is ice made of?", &["water"], &["h2o"], 2)],
        );
        quiz.id = "quiz-open".to_string();
        quiz
    }

    pub fn active_session(quiz: &Quiz, user_id: &str) -> QuizSession {
        let mut session = QuizSession::new(quiz, user_id, None);
        session.status = SessionStatus::Active;
        session.start_time = Some(chrono::Utc::now());
        session.time_remaining_seconds = session.time_limit_seconds();
        session
    }

    pub fn claims(sub: &str, role: UserRole) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: sub.to_string(),
            email: format!("{}@example.com", sub),
            role,
            iat: 0,
            exp: 9_999_999_999,
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::SessionStatus;

    #[test]
    fn test_fixtures_timed_quiz() {
        let quiz = timed_quiz(10);
        assert_eq!(quiz.time_limit_minutes, Some(10));
        assert_eq!(quiz.questions.len(), 2);
        assert!(quiz.is_published());
    }

    #[test]
    fn test_fixtures_active_session() {
        let session = active_session(&timed_quiz(5), "user-1");
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.time_remaining_seconds, Some(300));
    }
}

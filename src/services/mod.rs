pub mod grading_service;
pub mod quiz_attempt_service;
pub mod quiz_session_service;

pub use grading_service::{GradedQuiz, GradingService};
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_session_service::QuizSessionService;

pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_session;
pub mod user;
pub use quiz::{Question, QuestionOption, QuestionType, Quiz};
pub use quiz_attempt::{QuestionResult, QuizAttempt};
pub use quiz_session::{QuizSession, SessionStatus};
pub use user::{Capability, User, UserRole};

pub mod request;
pub mod response;

pub use request::{
    AttemptQueryParams, PaginationParams, StartQuizSessionRequest, SubmitQuizAttemptRequest,
    UpdateQuizSessionRequest,
};
pub use response::{PaginationMetadata, QuizAttemptPage, SessionAckResponse};

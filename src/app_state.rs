use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizAttemptRepository, MongoQuizRepository, MongoQuizSessionRepository,
        QuizAttemptRepository, QuizRepository, QuizSessionRepository,
    },
    services::{QuizAttemptService, QuizSessionService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_session_service: Arc<QuizSessionService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config.quizzes_collection));
        quiz_repository.ensure_indexes().await?;

        let session_repository = Arc::new(MongoQuizSessionRepository::new(
            &db,
            &config.quiz_sessions_collection,
        ));
        session_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(
            &db,
            &config.quiz_attempts_collection,
        ));
        attempt_repository.ensure_indexes().await?;

        Ok(Self::from_repositories(
            config,
            quiz_repository,
            session_repository,
            attempt_repository,
        ))
    }

    /// Wire services over any repository implementations.
    pub fn from_repositories(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        session_repository: Arc<dyn QuizSessionRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            Arc::clone(&quiz_repository),
            attempt_repository,
        ));
        let quiz_session_service = Arc::new(QuizSessionService::new(
            quiz_repository,
            session_repository,
            Arc::clone(&quiz_attempt_service),
        ));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            quiz_session_service,
            quiz_attempt_service,
            jwt_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}

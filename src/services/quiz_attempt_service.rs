use std::sync::Arc;

use crate::auth::require_owner;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Quiz, QuizAttempt};
use crate::repositories::{QuizAttemptRepository, QuizRepository};
use crate::services::grading_service::{round_two_decimals, GradingService};

/// Records graded attempts and keeps the quiz's denormalized statistics
/// (`total_attempts`, `average_score`) in step with them.
pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
        }
    }

    /// Grade `answers` against `quiz` and persist the result.
    ///
    /// Statistics are recalculated in the background once the attempt is
    /// stored; a failure there is logged and leaves the attempt in place.
    pub async fn record_attempt(
        &self,
        quiz: &Quiz,
        user_id: &str,
        session_id: Option<&str>,
        answers: &[String],
        time_taken_minutes: Option<f64>,
    ) -> AppResult<QuizAttempt> {
        let graded = GradingService::grade(quiz, answers);
        let attempt =
            QuizAttempt::from_grading(&quiz.id, user_id, session_id, graded, time_taken_minutes);
        let attempt = self.attempt_repository.create(attempt).await?;

        log::info!(
            "Recorded attempt {} for quiz {} by user {}: {}/{} ({}%)",
            attempt.id,
            attempt.quiz_id,
            attempt.user_id,
            attempt.score,
            attempt.total_questions,
            attempt.percentage
        );

        self.spawn_statistics_refresh(&quiz.id);
        Ok(attempt)
    }

    /// Direct submission without a session. Only published quizzes accept
    /// attempts.
    pub async fn submit_direct(
        &self,
        quiz_id: &str,
        user_id: &str,
        answers: &[String],
    ) -> AppResult<QuizAttempt> {
        let quiz = self
            .quiz_repository
            .find_published_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        self.record_attempt(&quiz, user_id, None, answers, None).await
    }

    pub async fn list_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        self.attempt_repository
            .get_user_attempts(user_id, quiz_id, offset, limit)
            .await
    }

    pub async fn get_attempt(&self, attempt_id: &str, user_id: &str) -> AppResult<QuizAttempt> {
        let attempt = self
            .attempt_repository
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz attempt not found".to_string()))?;

        require_owner(user_id, &attempt.user_id, "Quiz attempt")?;
        Ok(attempt)
    }

    pub async fn recalculate_quiz_statistics(&self, quiz_id: &str) -> AppResult<(i64, f64)> {
        recalculate_statistics(
            self.quiz_repository.as_ref(),
            self.attempt_repository.as_ref(),
            quiz_id,
        )
        .await
    }

    fn spawn_statistics_refresh(&self, quiz_id: &str) {
        let quiz_repository = Arc::clone(&self.quiz_repository);
        let attempt_repository = Arc::clone(&self.attempt_repository);
        let quiz_id = quiz_id.to_string();

        tokio::spawn(async move {
            if let Err(err) = recalculate_statistics(
                quiz_repository.as_ref(),
                attempt_repository.as_ref(),
                &quiz_id,
            )
            .await
            {
                log::error!("Failed to recalculate statistics for quiz {}: {}", quiz_id, err);
            }
        });
    }
}

/// Re-read every attempt for the quiz and overwrite its aggregate fields.
/// Concurrent recalculations may overwrite each other; the last one wins.
async fn recalculate_statistics(
    quiz_repository: &dyn QuizRepository,
    attempt_repository: &dyn QuizAttemptRepository,
    quiz_id: &str,
) -> AppResult<(i64, f64)> {
    let attempts = attempt_repository.find_by_quiz(quiz_id).await?;
    let total_attempts = attempts.len() as i64;
    let average_score = if attempts.is_empty() {
        0.0
    } else {
        let sum: f64 = attempts.iter().map(|a| a.percentage).sum();
        round_two_decimals(sum / attempts.len() as f64)
    };

    quiz_repository
        .update_statistics(quiz_id, total_attempts, average_score)
        .await?;

    log::debug!(
        "Quiz {} statistics: {} attempts, average {}",
        quiz_id,
        total_attempts,
        average_score
    );
    Ok((total_attempts, average_score))
}

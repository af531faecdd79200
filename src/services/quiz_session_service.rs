use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::require_owner;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{QuizAttempt, QuizSession, SessionStatus};
use crate::repositories::{QuizRepository, QuizSessionRepository, SessionChanges};
use crate::services::quiz_attempt_service::QuizAttemptService;

/// Every status a session can be submitted from.
const SUBMITTABLE: [SessionStatus; 4] = [
    SessionStatus::Pending,
    SessionStatus::Active,
    SessionStatus::Paused,
    SessionStatus::Expired,
];

/// Session state machine.
///
/// No session state is held in memory: every operation reads the session from
/// the store and writes transitions back through a conditional update on
/// `(id, user_id, status)`, so concurrent requests (or server replicas) cannot
/// both win the same transition. Remaining time is derived on read and expiry
/// is applied lazily by whichever operation notices it first.
pub struct QuizSessionService {
    quiz_repository: Arc<dyn QuizRepository>,
    session_repository: Arc<dyn QuizSessionRepository>,
    attempt_service: Arc<QuizAttemptService>,
}

impl QuizSessionService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        session_repository: Arc<dyn QuizSessionRepository>,
        attempt_service: Arc<QuizAttemptService>,
    ) -> Self {
        Self {
            quiz_repository,
            session_repository,
            attempt_service,
        }
    }

    pub async fn start(
        &self,
        quiz_id: &str,
        user_id: &str,
        time_limit_minutes: Option<i32>,
    ) -> AppResult<QuizSession> {
        if let Some(minutes) = time_limit_minutes {
            if minutes <= 0 {
                return Err(AppError::ValidationError(
                    "time_limit_minutes must be positive".to_string(),
                ));
            }
        }

        let quiz = self
            .quiz_repository
            .find_published_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let now = Utc::now();
        if let Some(existing) = self
            .session_repository
            .find_open_for_user(quiz_id, user_id)
            .await?
        {
            // A session that ran out of time unnoticed no longer blocks a new one.
            let expired = existing.is_time_up(now) && self.expire(&existing, now).await?.is_some();
            if !expired {
                return Err(AppError::Conflict(
                    "You already have an active session for this quiz".to_string(),
                ));
            }
        }

        let session = self
            .session_repository
            .create(QuizSession::new(&quiz, user_id, time_limit_minutes))
            .await?;

        log::info!(
            "Started quiz session {} for quiz {} by user {} (time limit: {:?} min)",
            session.id,
            session.quiz_id,
            session.user_id,
            session.time_limit_minutes
        );
        Ok(session)
    }

    pub async fn activate(&self, session_id: &str, user_id: &str) -> AppResult<QuizSession> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;

        let changes = SessionChanges::new(now)
            .status(SessionStatus::Active)
            .start_time(now)
            .time_remaining_seconds(session.time_limit_seconds())
            .touch_activity();

        self.transition(&session, &[SessionStatus::Pending], changes, "activate")
            .await
    }

    /// Current view of the session with a freshly computed remaining time.
    /// An active timed session whose time is up comes back `expired`.
    pub async fn get_status(&self, session_id: &str, user_id: &str) -> AppResult<QuizSession> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;

        if session.status != SessionStatus::Active || session.time_limit_minutes.is_none() {
            return Ok(session);
        }

        let remaining = session.remaining_seconds(now);
        let changes = SessionChanges::new(now).time_remaining_seconds(remaining);
        match self
            .session_repository
            .update_if_status(&session.id, user_id, &[SessionStatus::Active], changes)
            .await?
        {
            Some(updated) => Ok(updated),
            None => self.reload(session_id).await,
        }
    }

    pub async fn update(
        &self,
        session_id: &str,
        user_id: &str,
        current_question_index: i32,
        answers: Vec<String>,
    ) -> AppResult<QuizSession> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;
        ensure_status(&session, &[SessionStatus::Active, SessionStatus::Paused], "update")?;

        if current_question_index < 0 {
            return Err(AppError::ValidationError(
                "current_question_index must not be negative".to_string(),
            ));
        }
        if answers.len() > session.total_questions.max(0) as usize {
            return Err(AppError::ValidationError(format!(
                "Received {} answers for a quiz with {} questions",
                answers.len(),
                session.total_questions
            )));
        }

        let changes = SessionChanges::new(now)
            .progress(current_question_index, answers)
            .touch_activity();

        self.transition(
            &session,
            &[SessionStatus::Active, SessionStatus::Paused],
            changes,
            "update",
        )
        .await
    }

    pub async fn pause(&self, session_id: &str, user_id: &str) -> AppResult<QuizSession> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;

        let changes = SessionChanges::new(now)
            .status(SessionStatus::Paused)
            .time_remaining_seconds(session.remaining_seconds(now));

        self.transition(&session, &[SessionStatus::Active], changes, "pause")
            .await
    }

    /// Resume a paused session. `start_time` is kept, so time spent paused
    /// still counts against the limit.
    pub async fn resume(&self, session_id: &str, user_id: &str) -> AppResult<QuizSession> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;

        let changes = SessionChanges::new(now)
            .status(SessionStatus::Active)
            .touch_activity();

        self.transition(&session, &[SessionStatus::Paused], changes, "resume")
            .await
    }

    /// Complete the session and grade its buffered answers.
    ///
    /// The conditional update to `completed` is the double-submit guard: of
    /// two racing submits only one matches, the other gets `Conflict`.
    pub async fn submit(&self, session_id: &str, user_id: &str) -> AppResult<QuizAttempt> {
        let now = Utc::now();
        let session = self.current_session(session_id, user_id, now).await?;

        if session.status == SessionStatus::Completed {
            return Err(already_submitted());
        }

        let quiz = self
            .quiz_repository
            .find_by_id(&session.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let changes = SessionChanges::new(now)
            .status(SessionStatus::Completed)
            .end_time(now)
            .time_remaining_seconds(session.remaining_seconds(now));

        let completed = self
            .session_repository
            .update_if_status(&session.id, user_id, &SUBMITTABLE, changes)
            .await?
            .ok_or_else(already_submitted)?;

        log::info!(
            "Quiz session {} by user {} is now {} (was {})",
            completed.id,
            completed.user_id,
            completed.status,
            session.status
        );

        let recorded = self
            .attempt_service
            .record_attempt(
                &quiz,
                user_id,
                Some(&completed.id),
                &completed.answers,
                completed.time_taken_minutes(),
            )
            .await;

        match recorded {
            Err(err) if !matches!(err, AppError::Conflict(_)) => {
                self.reopen(&session, now).await;
                Err(err)
            }
            other => other,
        }
    }

    /// All of the caller's sessions, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<QuizSession>> {
        self.session_repository.list_by_user(user_id).await
    }

    /// Reachability of the session store, for readiness probes.
    pub async fn health_check(&self) -> AppResult<()> {
        self.session_repository.health_check().await
    }

    /// Load an owned session and apply lazy expiry.
    async fn current_session(
        &self,
        session_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<QuizSession> {
        let session = self
            .session_repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(session_not_found)?;
        require_owner(user_id, &session.user_id, "Quiz session")?;

        if !session.is_time_up(now) {
            return Ok(session);
        }

        match self.expire(&session, now).await? {
            Some(expired) => Ok(expired),
            None => self.reload(session_id).await,
        }
    }

    async fn expire(
        &self,
        session: &QuizSession,
        now: DateTime<Utc>,
    ) -> AppResult<Option<QuizSession>> {
        let changes = SessionChanges::new(now)
            .status(SessionStatus::Expired)
            .time_remaining_seconds(Some(0));

        let expired = self
            .session_repository
            .update_if_status(&session.id, &session.user_id, &[SessionStatus::Active], changes)
            .await?;

        if let Some(expired) = &expired {
            log::info!(
                "Quiz session {} by user {} expired after {:?} min",
                expired.id,
                expired.user_id,
                expired.time_limit_minutes
            );
        }
        Ok(expired)
    }

    async fn transition(
        &self,
        session: &QuizSession,
        allowed: &[SessionStatus],
        changes: SessionChanges,
        action: &str,
    ) -> AppResult<QuizSession> {
        ensure_status(session, allowed, action)?;
        let target = changes.status;

        match self
            .session_repository
            .update_if_status(&session.id, &session.user_id, allowed, changes)
            .await?
        {
            Some(updated) => {
                if let Some(status) = target {
                    log::info!(
                        "Quiz session {} by user {} is now {} (was {})",
                        updated.id,
                        updated.user_id,
                        status,
                        session.status
                    );
                }
                Ok(updated)
            }
            None => {
                // Lost a race with another request; report what it left behind.
                let current = self.reload(&session.id).await?;
                ensure_status(&current, allowed, action)?;
                Err(AppError::InvalidState(format!(
                    "Cannot {} quiz session right now",
                    action
                )))
            }
        }
    }

    /// Undo a completion whose attempt was never stored, so the submission
    /// can be retried. Only a session still `completed` is touched.
    async fn reopen(&self, previous: &QuizSession, now: DateTime<Utc>) {
        let changes = SessionChanges::new(now)
            .status(previous.status)
            .clear_end_time()
            .time_remaining_seconds(previous.time_remaining_seconds);

        match self
            .session_repository
            .update_if_status(
                &previous.id,
                &previous.user_id,
                &[SessionStatus::Completed],
                changes,
            )
            .await
        {
            Ok(Some(reopened)) => log::warn!(
                "Quiz session {} by user {} reopened as {} after its attempt failed to save",
                reopened.id,
                reopened.user_id,
                reopened.status
            ),
            Ok(None) => log::warn!(
                "Quiz session {} was no longer completed when reopening it",
                previous.id
            ),
            Err(err) => log::error!(
                "Failed to reopen quiz session {} after its attempt failed to save: {}",
                previous.id,
                err
            ),
        }
    }

    async fn reload(&self, session_id: &str) -> AppResult<QuizSession> {
        self.session_repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(session_not_found)
    }
}

fn ensure_status(session: &QuizSession, allowed: &[SessionStatus], action: &str) -> AppResult<()> {
    if allowed.contains(&session.status) {
        return Ok(());
    }
    Err(AppError::InvalidState(format!(
        "Cannot {} a quiz session that is {}",
        action, session.status
    )))
}

fn session_not_found() -> AppError {
    AppError::NotFound("Quiz session not found".to_string())
}

fn already_submitted() -> AppError {
    AppError::Conflict("Quiz session already submitted".to_string())
}

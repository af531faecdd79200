use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Quiz;
use crate::services::grading_service::round_two_decimals;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Active,
    Paused,
    Expired,
    Completed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Expired | SessionStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Expired => "expired",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizSession {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub time_limit_minutes: Option<i32>,
    pub time_remaining_seconds: Option<i64>,
    pub current_question_index: i32,
    pub total_questions: i32,
    pub answers: Vec<String>,
    pub is_auto_submit: bool,
    /// Mirrors `!status.is_terminal()`; backs the partial unique index that
    /// prevents two open sessions for the same (quiz, user).
    #[graphql(skip)]
    pub in_progress: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(quiz: &Quiz, user_id: &str, time_limit_override: Option<i32>) -> Self {
        let now = Utc::now();
        let time_limit_minutes = time_limit_override.or(quiz.time_limit_minutes);

        QuizSession {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            user_id: user_id.to_string(),
            status: SessionStatus::Pending,
            start_time: None,
            end_time: None,
            time_limit_minutes,
            time_remaining_seconds: None,
            current_question_index: 0,
            total_questions: quiz.question_count(),
            answers: Vec::new(),
            is_auto_submit: time_limit_minutes.is_some(),
            in_progress: true,
            created_at: now,
            updated_at: now,
            last_activity: now,
        }
    }

    pub fn time_limit_seconds(&self) -> Option<i64> {
        self.time_limit_minutes.map(|minutes| i64::from(minutes) * 60)
    }

    /// Remaining time derived from the activation reference point.
    ///
    /// Untimed sessions have no remaining time. Only an active session counts
    /// down from `start_time`; any other status reports the last persisted
    /// value. Time spent paused is not credited back.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        let limit = self.time_limit_seconds()?;

        match (self.status, self.start_time) {
            (SessionStatus::Active, Some(start)) => {
                let elapsed = (now - start).num_seconds().max(0);
                Some((limit - elapsed).max(0))
            }
            _ => self.time_remaining_seconds,
        }
    }

    pub fn is_time_up(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Active
            && self.remaining_seconds(now).is_some_and(|remaining| remaining <= 0)
    }

    /// Minutes between activation and completion, for timed sessions only.
    /// Never exceeds the time limit, even when expiry was noticed late.
    pub fn time_taken_minutes(&self) -> Option<f64> {
        let limit_seconds = self.time_limit_seconds()?;
        let (start, end) = (self.start_time?, self.end_time?);
        let seconds = (end - start).num_seconds().clamp(0, limit_seconds) as f64;
        Some(round_two_decimals(seconds / 60.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{timed_quiz, untimed_quiz};
    use chrono::Duration;

    fn active_session(limit_minutes: i32, started_secs_ago: i64) -> QuizSession {
        let quiz = timed_quiz(limit_minutes);
        let mut session = QuizSession::new(&quiz, "user-1", None);
        session.status = SessionStatus::Active;
        session.start_time = Some(Utc::now() - Duration::seconds(started_secs_ago));
        session.time_remaining_seconds = session.time_limit_seconds();
        session
    }

    #[test]
    fn new_session_snapshots_quiz() {
        let quiz = timed_quiz(10);
        let session = QuizSession::new(&quiz, "user-1", None);

        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.total_questions, 2);
        assert_eq!(session.time_limit_minutes, Some(10));
        assert!(session.is_auto_submit);
        assert!(session.in_progress);
        assert!(session.start_time.is_none());
    }

    #[test]
    fn explicit_time_limit_overrides_quiz_default() {
        let session = QuizSession::new(&untimed_quiz(), "user-1", Some(5));

        assert_eq!(session.time_limit_minutes, Some(5));
        assert!(session.is_auto_submit);
    }

    #[test]
    fn untimed_session_never_reports_remaining_time() {
        let mut session = QuizSession::new(&untimed_quiz(), "user-1", None);
        assert!(!session.is_auto_submit);
        assert_eq!(session.remaining_seconds(Utc::now()), None);

        session.status = SessionStatus::Active;
        session.start_time = Some(Utc::now() - Duration::hours(5));
        assert_eq!(session.remaining_seconds(Utc::now()), None);
        assert!(!session.is_time_up(Utc::now()));
    }

    #[test]
    fn remaining_seconds_counts_down_and_clamps_at_zero() {
        let session = active_session(10, 0);
        let start = session.start_time.unwrap();

        assert_eq!(session.remaining_seconds(start), Some(600));
        assert_eq!(session.remaining_seconds(start + Duration::seconds(90)), Some(510));
        assert_eq!(session.remaining_seconds(start + Duration::minutes(10)), Some(0));
        assert_eq!(session.remaining_seconds(start + Duration::minutes(30)), Some(0));
    }

    #[test]
    fn remaining_seconds_is_monotonic() {
        let session = active_session(1, 0);
        let start = session.start_time.unwrap();

        let readings: Vec<i64> = (0..80)
            .map(|s| session.remaining_seconds(start + Duration::seconds(s)).unwrap())
            .collect();

        assert!(readings.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*readings.last().unwrap(), 0);
    }

    #[test]
    fn paused_session_reports_stored_value() {
        let mut session = active_session(10, 120);
        session.status = SessionStatus::Paused;
        session.time_remaining_seconds = Some(480);

        assert_eq!(session.remaining_seconds(Utc::now() + Duration::hours(1)), Some(480));
        assert!(!session.is_time_up(Utc::now() + Duration::hours(1)));
    }

    #[test]
    fn time_is_up_once_limit_elapsed() {
        assert!(active_session(1, 61).is_time_up(Utc::now()));
        assert!(!active_session(1, 30).is_time_up(Utc::now()));
    }

    #[test]
    fn time_taken_only_for_timed_sessions() {
        let mut session = active_session(10, 150);
        session.end_time = Some(session.start_time.unwrap() + Duration::seconds(150));
        assert_eq!(session.time_taken_minutes(), Some(2.5));

        session.end_time = Some(session.start_time.unwrap() + Duration::minutes(45));
        assert_eq!(session.time_taken_minutes(), Some(10.0));

        let mut untimed = QuizSession::new(&untimed_quiz(), "user-1", None);
        untimed.start_time = Some(Utc::now());
        untimed.end_time = Some(Utc::now());
        assert_eq!(untimed.time_taken_minutes(), None);
    }

    #[test]
    fn status_terminality() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Expired.is_terminal());
        assert!(!SessionStatus::Paused.is_terminal());
        assert_eq!(
            serde_json::to_string(&SessionStatus::Paused).unwrap(),
            "\"paused\""
        );
    }
}

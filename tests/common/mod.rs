#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use squiz_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz, QuizAttempt, QuizSession, SessionStatus},
    repositories::{QuizAttemptRepository, QuizRepository, QuizSessionRepository, SessionChanges},
};

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id.clone(), quiz);
    }

    pub async fn get(&self, id: &str) -> Option<Quiz> {
        self.quizzes.read().await.get(id).cloned()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_published_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).filter(|q| q.is_published()).cloned())
    }

    async fn update_statistics(
        &self,
        quiz_id: &str,
        total_attempts: i64,
        average_score: f64,
    ) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .get_mut(quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;
        quiz.total_attempts = total_attempts;
        quiz.average_score = average_score;
        quiz.updated_at = Some(Utc::now());
        Ok(())
    }
}

/// Holds the same guarantees as the MongoDB indexes: at most one open
/// session per (quiz, user), and atomic status-conditional updates.
pub struct InMemoryQuizSessionRepository {
    sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
}

impl InMemoryQuizSessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Move the timer reference point into the past.
    pub async fn backdate_start(&self, session_id: &str, seconds: i64) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if let Some(start) = session.start_time {
                session.start_time = Some(start - Duration::seconds(seconds));
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<QuizSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn open_count(&self, quiz_id: &str, user_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.quiz_id == quiz_id && s.user_id == user_id && s.in_progress)
            .count()
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryQuizSessionRepository {
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession> {
        let mut sessions = self.sessions.write().await;
        let duplicate = sessions.values().any(|s| {
            s.in_progress && s.quiz_id == session.quiz_id && s.user_id == session.user_id
        });
        if duplicate {
            return Err(AppError::Conflict(
                "An active session already exists for this quiz".to_string(),
            ));
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_open_for_user(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Option<QuizSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| s.in_progress && s.quiz_id == quiz_id && s.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizSession>> {
        let sessions = self.sessions.read().await;
        let mut items: Vec<_> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_if_status(
        &self,
        id: &str,
        user_id: &str,
        allowed: &[SessionStatus],
        changes: SessionChanges,
    ) -> AppResult<Option<QuizSession>> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.user_id != user_id || !allowed.contains(&session.status) {
            return Ok(None);
        }
        changes.apply(session);
        Ok(Some(session.clone()))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<Vec<QuizAttempt>>>,
    fail_next_create: AtomicBool,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(Vec::new())),
            fail_next_create: AtomicBool::new(false),
        }
    }

    /// Make the next `create` fail as if the store were unreachable.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub async fn count_for_session(&self, session_id: &str) -> usize {
        self.attempts
            .read()
            .await
            .iter()
            .filter(|a| a.session_id.as_deref() == Some(session_id))
            .count()
    }

    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }
        let mut attempts = self.attempts.write().await;
        if let Some(session_id) = &attempt.session_id {
            if attempts.iter().any(|a| a.session_id.as_ref() == Some(session_id)) {
                return Err(AppError::Conflict("Quiz session already submitted".to_string()));
            }
        }
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.iter().filter(|a| a.quiz_id == quiz_id).cloned().collect())
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| quiz_id.as_deref().map_or(true, |qid| a.quiz_id == qid))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}

pub struct TestContext {
    pub state: AppState,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub sessions: Arc<InMemoryQuizSessionRepository>,
    pub attempts: Arc<InMemoryQuizAttemptRepository>,
}

impl TestContext {
    pub async fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let sessions = Arc::new(InMemoryQuizSessionRepository::new());
        let attempts = Arc::new(InMemoryQuizAttemptRepository::new());

        quizzes.insert(timed_quiz(10)).await;
        quizzes.insert(untimed_quiz()).await;
        quizzes.insert(draft_quiz()).await;
        quizzes.insert(open_ended_quiz()).await;

        let state = AppState::from_repositories(
            Config::from_env(),
            quizzes.clone(),
            sessions.clone(),
            attempts.clone(),
        );

        Self {
            state,
            quizzes,
            sessions,
            attempts,
        }
    }
}

pub fn answers(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn general_knowledge() -> Vec<Question> {
    vec![
        Question::multiple_choice("What is 5 + 3?", &[("7", false), ("8", true)], 1)
            .with_explanation("5 + 3 = 8"),
        Question::multiple_choice(
            "What is the capital of France?",
            &[("London", false), ("Paris", true), ("Rome", false)],
            1,
        ),
    ]
}

/// Correct answers are "8" and "Paris".
pub fn timed_quiz(minutes: i32) -> Quiz {
    let mut quiz = Quiz::new("General knowledge (timed)", general_knowledge()).with_time_limit(minutes);
    quiz.id = "quiz-timed".to_string();
    quiz
}

pub fn untimed_quiz() -> Quiz {
    let mut quiz = Quiz::new("General knowledge", general_knowledge());
    quiz.id = "quiz-untimed".to_string();
    quiz
}

pub fn draft_quiz() -> Quiz {
    let mut quiz = Quiz::new("Unfinished", general_knowledge()).as_draft();
    quiz.id = "quiz-draft".to_string();
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

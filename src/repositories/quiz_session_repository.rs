use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::{QuizSession, SessionStatus},
};

/// A set of field writes applied to one session in a single conditional
/// update. `updated_at` is always refreshed.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionChanges {
    pub at: DateTime<Utc>,
    pub status: Option<SessionStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub clear_end_time: bool,
    pub time_remaining_seconds: Option<i64>,
    pub current_question_index: Option<i32>,
    pub answers: Option<Vec<String>>,
    pub touch_activity: bool,
}

impl SessionChanges {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            status: None,
            start_time: None,
            end_time: None,
            clear_end_time: false,
            time_remaining_seconds: None,
            current_question_index: None,
            answers: None,
            touch_activity: false,
        }
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn clear_end_time(mut self) -> Self {
        self.end_time = None;
        self.clear_end_time = true;
        self
    }

    pub fn time_remaining_seconds(mut self, seconds: Option<i64>) -> Self {
        self.time_remaining_seconds = seconds;
        self
    }

    pub fn progress(mut self, current_question_index: i32, answers: Vec<String>) -> Self {
        self.current_question_index = Some(current_question_index);
        self.answers = Some(answers);
        self
    }

    pub fn touch_activity(mut self) -> Self {
        self.touch_activity = true;
        self
    }

    /// Apply the changes to an in-memory copy of the session.
    pub fn apply(&self, session: &mut QuizSession) {
        if let Some(status) = self.status {
            session.status = status;
            session.in_progress = !status.is_terminal();
        }
        if let Some(start_time) = self.start_time {
            session.start_time = Some(start_time);
        }
        if let Some(end_time) = self.end_time {
            session.end_time = Some(end_time);
        } else if self.clear_end_time {
            session.end_time = None;
        }
        if let Some(remaining) = self.time_remaining_seconds {
            session.time_remaining_seconds = Some(remaining);
        }
        if let Some(index) = self.current_question_index {
            session.current_question_index = index;
        }
        if let Some(answers) = &self.answers {
            session.answers = answers.clone();
        }
        if self.touch_activity {
            session.last_activity = self.at;
        }
        session.updated_at = self.at;
    }

    /// The `$set` document equivalent to [`SessionChanges::apply`].
    pub fn to_set_document(&self) -> AppResult<Document> {
        let mut set = doc! { "updated_at": to_bson(&self.at)? };

        if let Some(status) = self.status {
            set.insert("status", to_bson(&status)?);
            set.insert("in_progress", !status.is_terminal());
        }
        if let Some(start_time) = &self.start_time {
            set.insert("start_time", to_bson(start_time)?);
        }
        if let Some(end_time) = &self.end_time {
            set.insert("end_time", to_bson(end_time)?);
        } else if self.clear_end_time {
            set.insert("end_time", Bson::Null);
        }
        if let Some(remaining) = self.time_remaining_seconds {
            set.insert("time_remaining_seconds", remaining);
        }
        if let Some(index) = self.current_question_index {
            set.insert("current_question_index", index);
        }
        if let Some(answers) = &self.answers {
            set.insert("answers", answers.clone());
        }
        if self.touch_activity {
            set.insert("last_activity", to_bson(&self.at)?);
        }

        Ok(set)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    /// Insert a new session. Fails with `Conflict` if the user already holds an
    /// open session for the quiz.
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>>;
    async fn find_open_for_user(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Option<QuizSession>>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizSession>>;
    /// Apply `changes` only if the session belongs to `user_id` and its status
    /// is one of `allowed`. Returns the updated session, or `None` when nothing
    /// matched.
    async fn update_if_status(
        &self,
        id: &str,
        user_id: &str,
        allowed: &[SessionStatus],
        changes: SessionChanges,
    ) -> AppResult<Option<QuizSession>>;
    async fn health_check(&self) -> AppResult<()>;
}

pub struct MongoQuizSessionRepository {
    collection: Collection<QuizSession>,
    db: Database,
}

impl MongoQuizSessionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self {
            collection,
            db: db.clone(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let open_session_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "in_progress": true })
                    .name("open_session_per_user_quiz".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(open_session_index).await?;
        self.collection.create_index(user_index).await?;

        log::info!("Successfully created indexes for quiz_sessions collection");
        Ok(())
    }
}

#[async_trait]
impl QuizSessionRepository for MongoQuizSessionRepository {
    async fn create(&self, session: QuizSession) -> AppResult<QuizSession> {
        match self.collection.insert_one(&session).await {
            Ok(_) => Ok(session),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::Conflict(
                "An active session already exists for this quiz".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn find_open_for_user(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Option<QuizSession>> {
        let session = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
                "in_progress": true,
            })
            .await?;
        Ok(session)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<QuizSession>> {
        let sessions = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn update_if_status(
        &self,
        id: &str,
        user_id: &str,
        allowed: &[SessionStatus],
        changes: SessionChanges,
    ) -> AppResult<Option<QuizSession>> {
        let allowed = to_bson(allowed)?;
        let update = doc! { "$set": changes.to_set_document()? };

        let session = self
            .collection
            .find_one_and_update(
                doc! {
                    "id": id,
                    "user_id": user_id,
                    "status": { "$in": allowed },
                },
                update,
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(session)
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}

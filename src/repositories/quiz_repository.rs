use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

/// Read access to the quiz catalog, plus the one write the session core makes:
/// overwriting the denormalized attempt statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_published_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn update_statistics(
        &self,
        quiz_id: &str,
        total_attempts: i64,
        average_score: f64,
    ) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_published_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "id": id, "is_draft": { "$ne": true } })
            .await?;
        Ok(quiz)
    }

    async fn update_statistics(
        &self,
        quiz_id: &str,
        total_attempts: i64,
        average_score: f64,
    ) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": quiz_id },
                doc! {
                    "$set": {
                        "total_attempts": total_attempts,
                        "average_score": average_score,
                        "updated_at": to_bson(&Utc::now())?,
                    }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz_id
            )));
        }

        Ok(())
    }
}

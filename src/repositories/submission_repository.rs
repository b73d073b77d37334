use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::FindOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizSubmission};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn insert(&self, submission: QuizSubmission) -> AppResult<QuizSubmission>;
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizSubmission>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<QuizSubmission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_submissions");
        Self { collection }
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn insert(&self, submission: QuizSubmission) -> AppResult<QuizSubmission> {
        self.collection.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizSubmission>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "submitted_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .with_options(find_options)
            .await?;
        let items: Vec<QuizSubmission> = cursor.try_collect().await?;

        Ok(items)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "submitted_at": -1 })
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on quiz_submissions.quiz_id");

        Ok(())
    }
}

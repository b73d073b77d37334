use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::{
        domain::{PublicationWindow, Quiz},
        timestamps,
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn insert(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_by_classroom(&self, classroom_id: &str, published_only: bool) -> AppResult<Vec<Quiz>>;
    /// Writes the published flag and both timestamps in one update and
    /// returns the updated quiz, or `None` if it does not exist.
    async fn set_publication(
        &self,
        id: &str,
        window: Option<PublicationWindow>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Quiz>>;
    /// Unpublishes every published quiz whose `unpublish_date <= now`.
    async fn unpublish_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn insert(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(quiz)
    }

    async fn list_by_classroom(&self, classroom_id: &str, published_only: bool) -> AppResult<Vec<Quiz>> {
        let mut filter = doc! { "classroom_id": classroom_id };
        if published_only {
            filter.insert("is_published", true);
        }

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let items: Vec<Quiz> = cursor.try_collect().await?;

        Ok(items)
    }

    async fn set_publication(
        &self,
        id: &str,
        window: Option<PublicationWindow>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Quiz>> {
        let update = doc! {
            "$set": {
                "is_published": window.is_some(),
                "published_at": window.map(|w| timestamps::to_bson(w.published_at)),
                "unpublish_date": window.map(|w| timestamps::to_bson(w.unpublish_date)),
                "updated_at": timestamps::to_bson(now),
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let quiz = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update)
            .with_options(options)
            .await?;

        Ok(quiz)
    }

    async fn unpublish_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(expired_filter(now), expiry_update(now))
            .await?;

        Ok(result.modified_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let classroom_index = IndexModel::builder()
            .keys(doc! { "classroom_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("classroom_recent".to_string()).build())
            .build();
        self.collection.create_index(classroom_index).await?;

        let sweep_index = IndexModel::builder()
            .keys(doc! { "is_published": 1, "unpublish_date": 1 })
            .options(IndexOptions::builder().name("publication_expiry".to_string()).build())
            .build();
        self.collection.create_index(sweep_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

/// Published quizzes whose window closed at or before `now`.
fn expired_filter(now: DateTime<Utc>) -> Document {
    doc! {
        "is_published": true,
        "unpublish_date": { "$ne": null, "$lte": timestamps::to_bson(now) },
    }
}

/// Unpublishes and clears both window timestamps together.
fn expiry_update(now: DateTime<Utc>) -> Document {
    doc! { "$set": {
        "is_published": false,
        "published_at": null,
        "unpublish_date": null,
        "updated_at": timestamps::to_bson(now),
    } }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::Bson;

    use super::*;

    #[test]
    fn expired_filter_matches_closed_windows_only() {
        let now = Utc::now();
        let filter = expired_filter(now);

        assert!(filter.get_bool("is_published").unwrap());
        let window = filter.get_document("unpublish_date").unwrap();
        assert_eq!(window.get("$ne"), Some(&Bson::Null));
        assert_eq!(
            window.get("$lte"),
            Some(&Bson::DateTime(timestamps::to_bson(now)))
        );
    }

    #[test]
    fn expiry_update_clears_the_whole_window() {
        let now = Utc::now();
        let update = expiry_update(now);
        let set = update.get_document("$set").unwrap();

        assert!(!set.get_bool("is_published").unwrap());
        assert_eq!(set.get("published_at"), Some(&Bson::Null));
        assert_eq!(set.get("unpublish_date"), Some(&Bson::Null));
        assert_eq!(
            set.get("updated_at"),
            Some(&Bson::DateTime(timestamps::to_bson(now)))
        );
    }
}

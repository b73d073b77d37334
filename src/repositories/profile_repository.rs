use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::{domain::Profile, timestamps},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn upsert(&self, profile: Profile) -> AppResult<Profile>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Profile>>;
    async fn assign_school(&self, id: &str, school_id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoProfileRepository {
    collection: Collection<Profile>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("profiles");
        Self { collection }
    }
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn upsert(&self, profile: Profile) -> AppResult<Profile> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "_id": &profile.id }, &profile)
            .with_options(options)
            .await?;

        Ok(profile)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Profile>> {
        let profile = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(profile)
    }

    async fn assign_school(&self, id: &str, school_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "school_id": school_id,
                    "updated_at": timestamps::to_bson(Utc::now()),
                } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Profile '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "school_id": 1, "classroom_id": 1 })
            .options(IndexOptions::builder().name("tenancy".to_string()).build())
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created tenancy index on profiles");

        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::{
        domain::{InvitationToken, UserRole},
        timestamps,
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InvitationTokenRepository: Send + Sync {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<InvitationToken>>;
    /// The classroom's current reusable token for `role`, expired or not.
    async fn find_active_reusable(
        &self,
        classroom_id: &str,
        role: UserRole,
    ) -> AppResult<Option<InvitationToken>>;
    /// Fails with `AlreadyExists` when another live reusable token holds the
    /// classroom/role slot.
    async fn insert(&self, token: InvitationToken) -> AppResult<InvitationToken>;
    async fn retire(&self, id: &str) -> AppResult<()>;
    /// Returns false if the token was already marked used.
    async fn mark_used(&self, id: &str, used_at: DateTime<Utc>) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoInvitationTokenRepository {
    collection: Collection<InvitationToken>,
}

impl MongoInvitationTokenRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("invitation_tokens");
        Self { collection }
    }
}

#[async_trait]
impl InvitationTokenRepository for MongoInvitationTokenRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<InvitationToken>> {
        let found = self.collection.find_one(doc! { "token": token }).await?;
        Ok(found)
    }

    async fn find_active_reusable(
        &self,
        classroom_id: &str,
        role: UserRole,
    ) -> AppResult<Option<InvitationToken>> {
        let found = self
            .collection
            .find_one(doc! {
                "classroom_id": classroom_id,
                "intended_role": role.as_str(),
                "reusable": true,
                "active": true,
            })
            .await?;
        Ok(found)
    }

    async fn insert(&self, token: InvitationToken) -> AppResult<InvitationToken> {
        match self.collection.insert_one(&token).await {
            Ok(_) => Ok(token),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "A live invitation already exists for classroom {:?}",
                token.classroom_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn retire(&self, id: &str) -> AppResult<()> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "active": false } })
            .await?;
        Ok(())
    }

    async fn mark_used(&self, id: &str, used_at: DateTime<Utc>) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "used_at": null },
                doc! { "$set": { "used_at": timestamps::to_bson(used_at) } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let token_model = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("token_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(token_model).await?;

        // at most one live reusable token per classroom and role
        let live_slot_model = IndexModel::builder()
            .keys(doc! { "classroom_id": 1, "intended_role": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "reusable": true, "active": true })
                    .name("live_reusable_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(live_slot_model).await?;

        log::info!("Created indexes on invitation_tokens");
        Ok(())
    }
}

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        Claims, JwtService,
    },
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::{ClaimSet, Identity},
};

const MIN_PASSWORD_LENGTH: usize = 8;

/// The identity half of a user account. Failures are opaque to callers and
/// nothing here retries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create_identity(&self, email: &str, password: &str, preconfirmed: bool) -> AppResult<String>;
    async fn delete_identity(&self, id: &str) -> AppResult<()>;
    async fn set_claims(&self, id: &str, claims: &ClaimSet) -> AppResult<()>;
    /// Decodes a bearer token into the caller's claims; the only failure
    /// mode is `Unauthorized`.
    async fn verify_token(&self, bearer_token: &str) -> AppResult<Claims>;
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String>;
}

pub struct MongoCredentialStore {
    collection: Collection<Identity>,
    jwt: JwtService,
}

impl MongoCredentialStore {
    pub fn new(db: &Database, jwt: JwtService) -> Self {
        let collection = db.get_collection("identities");
        Self { collection, jwt }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on identities.email");

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn create_identity(&self, email: &str, password: &str, preconfirmed: bool) -> AppResult<String> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let identity = Identity::new(email, hash_password(password)?, preconfirmed);

        match self.collection.insert_one(&identity).await {
            Ok(_) => Ok(identity.id),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "An account with email '{}' already exists",
                identity.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_identity(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Identity '{}' not found", id)));
        }

        Ok(())
    }

    async fn set_claims(&self, id: &str, claims: &ClaimSet) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "claims": to_bson(claims)? } })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Identity '{}' not found", id)));
        }

        Ok(())
    }

    async fn verify_token(&self, bearer_token: &str) -> AppResult<Claims> {
        let claims = self.jwt.validate_token(bearer_token)?;

        let exists = self
            .collection
            .find_one(doc! { "_id": &claims.user_id })
            .await
            .map_err(|e| AppError::Unauthorized(format!("Could not verify identity: {}", e)))?
            .is_some();

        if !exists {
            return Err(AppError::Unauthorized("Identity no longer exists".to_string()));
        }

        Ok(claims)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let identity = self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &identity.password_hash) {
            return Err(invalid());
        }

        if !identity.email_confirmed {
            return Err(AppError::Forbidden("Email address is not confirmed".to_string()));
        }

        let claims = identity.claims.as_ref().ok_or_else(|| {
            AppError::Forbidden("Account has no role assigned".to_string())
        })?;

        self.jwt.create_token(&identity.id, &identity.email, claims)
    }
}

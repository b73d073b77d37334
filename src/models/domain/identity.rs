use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{domain::user::ClaimSet, timestamps};

/// A credential-store identity. The profile row shares its id.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    /// argon2id PHC string.
    pub password_hash: String,
    pub email_confirmed: bool,
    pub claims: Option<ClaimSet>,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: &str, password_hash: String, preconfirmed: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            email_confirmed: preconfirmed,
            claims: None,
            created_at: Utc::now(),
        }
    }
}

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{domain::user::UserRole, timestamps};

const TOKEN_BYTES: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct InvitationToken {
    #[serde(rename = "_id")]
    pub id: String,
    pub token: String,
    pub school_id: String,
    pub classroom_id: Option<String>,
    pub intended_role: UserRole,
    /// Reusable tokens are shared by a whole classroom and never record a use.
    pub reusable: bool,
    /// Cleared when an expired reusable token is replaced, freeing the
    /// classroom's live-token slot.
    pub active: bool,
    #[serde(with = "timestamps")]
    pub expires_at: DateTime<Utc>,
    #[serde(default, with = "timestamps::option")]
    pub used_at: Option<DateTime<Utc>>,
    pub created_by: String,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
}

/// What a valid token grants to the account it provisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvitationGrant {
    pub token_id: String,
    pub school_id: String,
    pub classroom_id: Option<String>,
    pub intended_role: UserRole,
    pub single_use: bool,
}

impl InvitationToken {
    pub fn reusable_parent(
        classroom_id: &str,
        school_id: &str,
        created_by: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            token: generate_token_string(),
            school_id: school_id.to_string(),
            classroom_id: Some(classroom_id.to_string()),
            intended_role: UserRole::Parent,
            reusable: true,
            active: true,
            expires_at,
            used_at: None,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn single_use(
        school_id: &str,
        classroom_id: Option<&str>,
        intended_role: UserRole,
        created_by: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            token: generate_token_string(),
            school_id: school_id.to_string(),
            classroom_id: classroom_id.map(str::to_string),
            intended_role,
            reusable: false,
            active: true,
            expires_at,
            used_at: None,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && (self.reusable || self.used_at.is_none())
    }

    pub fn grant(&self) -> InvitationGrant {
        InvitationGrant {
            token_id: self.id.clone(),
            school_id: self.school_id.clone(),
            classroom_id: self.classroom_id.clone(),
            intended_role: self.intended_role,
            single_use: !self.reusable,
        }
    }
}

pub fn generate_token_string() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

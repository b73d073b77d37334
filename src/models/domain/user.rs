use std::fmt;

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamps;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Director,
    Teacher,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Director => "DIRECTOR",
            UserRole::Teacher => "TEACHER",
            UserRole::Parent => "PARENT",
        }
    }

    /// Roles that can be provisioned through an invitation token.
    pub fn is_invitable(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Parent)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role and tenancy attributes stamped onto a credential identity.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClaimSet {
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
}

impl ClaimSet {
    pub fn new(role: UserRole, school_id: Option<String>, classroom_id: Option<String>) -> Self {
        Self {
            role,
            school_id,
            classroom_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamps")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: &str, claims: &ClaimSet, full_name: &str, email: &str) -> Self {
        let now = Utc::now();
        Profile {
            id: id.to_string(),
            role: claims.role,
            school_id: claims.school_id.clone(),
            classroom_id: claims.classroom_id.clone(),
            full_name: full_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            created_at: now,
            updated_at: now,
        }
    }
}

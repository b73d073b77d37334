use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::user::{ClaimSet, UserRole};

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // identity id
    pub email: String,
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl JwtClaims {
    pub fn new(user_id: &str, email: &str, claims: &ClaimSet, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: claims.role,
            school_id: claims.school_id.clone(),
            classroom_id: claims.classroom_id.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

/// The authenticated caller, as seen by handlers and services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
}

impl From<JwtClaims> for Claims {
    fn from(jwt: JwtClaims) -> Self {
        Self {
            user_id: jwt.sub,
            email: jwt.email,
            role: jwt.role,
            school_id: jwt.school_id,
            classroom_id: jwt.classroom_id,
        }
    }
}

#[cfg(test)]
impl Claims {
    pub fn test_claims(role: UserRole, school_id: Option<&str>, classroom_id: Option<&str>) -> Self {
        Self {
            user_id: format!("{}-user", role.as_str().to_lowercase()),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            role,
            school_id: school_id.map(str::to_string),
            classroom_id: classroom_id.map(str::to_string),
        }
    }
}

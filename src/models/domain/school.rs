use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::timestamps;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct School {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub director_id: String,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
}

impl School {
    pub fn new(name: &str, director_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            director_id: director_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classroom {
    #[serde(rename = "_id")]
    pub id: String,
    pub school_id: String,
    pub name: String,
    pub grade_level: Option<String>,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
}

impl Classroom {
    pub fn new(school_id: &str, name: &str, grade_level: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            school_id: school_id.to_string(),
            name: name.trim().to_string(),
            grade_level,
            created_at: Utc::now(),
        }
    }
}

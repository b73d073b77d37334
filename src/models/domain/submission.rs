use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamps;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSubmission {
    #[serde(rename = "_id")]
    pub id: String,
    pub quiz_id: String,
    pub parent_id: String,
    pub child_name: String,
    pub answers: Vec<SubmittedAnswer>,
    pub score: i16,
    pub total: i16,
    #[serde(with = "timestamps")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    pub is_correct: bool,
}

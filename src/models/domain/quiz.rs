use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{domain::quiz_question::QuizQuestion, timestamps};

/// How long a quiz stays published before the sweep unpublishes it.
pub const PUBLISH_WINDOW_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub classroom_id: String,
    pub school_id: String,
    pub created_by: String,
    pub grade_level: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub is_published: bool,
    #[serde(default, with = "timestamps::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamps::option")]
    pub unpublish_date: Option<DateTime<Utc>>,
    #[serde(with = "timestamps")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamps")]
    pub updated_at: DateTime<Utc>,
}

/// The timestamp pair that exists only while a quiz is published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicationWindow {
    pub published_at: DateTime<Utc>,
    pub unpublish_date: DateTime<Utc>,
}

impl PublicationWindow {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            published_at: now,
            unpublish_date: now + Duration::days(PUBLISH_WINDOW_DAYS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicationState {
    Draft,
    Published(PublicationWindow),
}

pub struct NewQuiz {
    pub title: String,
    pub description: Option<String>,
    pub classroom_id: String,
    pub school_id: String,
    pub created_by: String,
    pub grade_level: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn new_draft(new_quiz: NewQuiz) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: new_quiz.title,
            description: new_quiz.description,
            classroom_id: new_quiz.classroom_id,
            school_id: new_quiz.school_id,
            created_by: new_quiz.created_by,
            grade_level: new_quiz.grade_level,
            questions: new_quiz.questions,
            is_published: false,
            published_at: None,
            unpublish_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn publication_state(&self) -> PublicationState {
        match (self.is_published, self.published_at, self.unpublish_date) {
            (true, Some(published_at), Some(unpublish_date)) => {
                PublicationState::Published(PublicationWindow {
                    published_at,
                    unpublish_date,
                })
            }
            _ => PublicationState::Draft,
        }
    }

    /// Overwrites the flag and both timestamps together.
    pub fn apply_publication(&mut self, window: Option<PublicationWindow>, now: DateTime<Utc>) {
        self.is_published = window.is_some();
        self.published_at = window.map(|w| w.published_at);
        self.unpublish_date = window.map(|w| w.unpublish_date);
        self.updated_at = now;
    }
}

#[cfg(test)]
impl Quiz {
    pub fn test_quiz(classroom_id: &str) -> Self {
        Quiz::new_draft(NewQuiz {
            title: "Fractions".to_string(),
            description: Some("Adding fractions".to_string()),
            classroom_id: classroom_id.to_string(),
            school_id: "school-1".to_string(),
            created_by: "teacher-1".to_string(),
            grade_level: Some("4".to_string()),
            questions: Vec::new(),
        })
    }
}

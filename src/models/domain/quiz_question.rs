use async_graphql::Enum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on questions per quiz; keeps `order` well inside `i16`.
pub const MAX_QUESTIONS: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub question_type: QuizQuestionType,
    pub options: Vec<QuizQuestionOption>,
    pub order: i16,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
    pub explanation: String, // why this option is right or wrong
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy, JsonSchema)]
pub enum QuizQuestionType {
    Single, // Only one correct option
    Multi,  // Multiple correct options
    Bool,   // True/False question
}

impl QuizQuestion {
    pub fn correct_option_ids(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| option.correct)
            .map(|option| option.id.as_str())
            .collect()
    }

    /// Checks the option set against the question type.
    pub fn validate_options(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err(format!("question {} has an empty prompt", self.order));
        }

        let correct = self.options.iter().filter(|o| o.correct).count();
        match self.question_type {
            QuizQuestionType::Single if self.options.len() < 2 || correct != 1 => Err(format!(
                "question {} must have at least two options and exactly one correct",
                self.order
            )),
            QuizQuestionType::Bool if self.options.len() != 2 || correct != 1 => Err(format!(
                "question {} must have two options and exactly one correct",
                self.order
            )),
            QuizQuestionType::Multi if self.options.len() < 2 || correct == 0 => Err(format!(
                "question {} must have at least two options and one correct",
                self.order
            )),
            _ => Ok(()),
        }
    }
}

/// The stored `order` for the question at `index`.
pub fn question_order(index: usize) -> Result<i16, String> {
    if index >= MAX_QUESTIONS {
        return Err(format!("A quiz holds at most {} questions", MAX_QUESTIONS));
    }
    i16::try_from(index).map_err(|err| err.to_string())
}

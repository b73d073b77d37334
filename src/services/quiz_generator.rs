use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    constants::prompts::QUIZ_GENERATOR_PROMPT,
    errors::{AppError, AppResult},
    models::domain::quiz_question::{
        question_order, QuizQuestion, QuizQuestionOption, QuizQuestionType,
    },
};

/// Quiz content as returned by the model, before ids are assigned.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedQuiz {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedQuestion {
    pub prompt: String,
    pub question_type: QuizQuestionType,
    pub options: Vec<GeneratedOption>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeneratedOption {
    pub text: String,
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
}

impl GeneratedQuiz {
    /// Assigns ids and order, rejecting questions whose options do not fit
    /// their type.
    pub fn into_questions(self) -> AppResult<Vec<QuizQuestion>> {
        if self.questions.is_empty() {
            return Err(AppError::AiResponseInvalid(
                "generated quiz has no questions".to_string(),
            ));
        }

        self.questions
            .into_iter()
            .enumerate()
            .map(|(index, generated)| {
                let question = QuizQuestion {
                    id: Uuid::new_v4().to_string(),
                    prompt: generated.prompt,
                    question_type: generated.question_type,
                    options: generated
                        .options
                        .into_iter()
                        .map(|option| QuizQuestionOption {
                            id: Uuid::new_v4().to_string(),
                            text: option.text,
                            correct: option.correct,
                            explanation: option.explanation,
                        })
                        .collect(),
                    order: question_order(index).map_err(AppError::AiResponseInvalid)?,
                };

                question
                    .validate_options()
                    .map_err(AppError::AiResponseInvalid)?;
                Ok(question)
            })
            .collect()
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate_quiz(&self, lesson_text: &str, grade_level: &str, model: &str) -> AppResult<GeneratedQuiz>;
}

pub struct OpenAiQuizGenerator {
    client: Client<OpenAIConfig>,
}

impl OpenAiQuizGenerator {
    pub fn new(api_key: &SecretString) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
        }
    }

    fn response_format() -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "generated_quiz",
                "schema": schemars::schema_for!(GeneratedQuiz),
            }
        })
    }
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    async fn generate_quiz(&self, lesson_text: &str, grade_level: &str, model: &str) -> AppResult<GeneratedQuiz> {
        log::info!("Requesting quiz generation from model {}", model);

        let response: Value = self
            .client
            .chat()
            .create_byot(json!({
                "model": model,
                "messages": [
                    { "role": "system", "content": QUIZ_GENERATOR_PROMPT },
                    {
                        "role": "user",
                        "content": format!("Grade level: {}\n\nLesson text:\n{}", grade_level, lesson_text),
                    }
                ],
                "response_format": Self::response_format(),
            }))
            .await
            .map_err(|e| AppError::AiResponseInvalid(format!("Model request failed: {}", e)))?;

        parse_generated_quiz(&response)
    }
}

/// Reads the first choice's message content as a `GeneratedQuiz`.
pub fn parse_generated_quiz(response: &Value) -> AppResult<GeneratedQuiz> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::AiResponseInvalid("response has no message content".to_string()))?;

    let content = strip_code_fence(content);

    serde_json::from_str(content)
        .map_err(|e| AppError::AiResponseInvalid(format!("content is not a valid quiz: {}", e)))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::quiz_question::MAX_QUESTIONS;

    fn chat_response(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    const QUIZ_JSON: &str = r#"{
        "title": "Plants",
        "description": "What plants need",
        "questions": [{
            "prompt": "Plants need sunlight to grow.",
            "question_type": "Bool",
            "options": [
                { "text": "True", "correct": true, "explanation": "Sunlight powers photosynthesis." },
                { "text": "False", "correct": false, "explanation": "They do need it." }
            ]
        }]
    }"#;

    #[test]
    fn parses_plain_and_fenced_content() {
        let plain = parse_generated_quiz(&chat_response(QUIZ_JSON)).unwrap();
        assert_eq!(plain.title, "Plants");

        let fenced = format!("```json\n{}\n```", QUIZ_JSON);
        let fenced = parse_generated_quiz(&chat_response(&fenced)).unwrap();
        assert_eq!(fenced.questions.len(), 1);
    }

    #[test]
    fn malformed_content_is_ai_response_invalid() {
        let result = parse_generated_quiz(&chat_response("Sure! Here is your quiz."));
        assert!(matches!(result, Err(AppError::AiResponseInvalid(_))));

        let result = parse_generated_quiz(&json!({ "choices": [] }));
        assert!(matches!(result, Err(AppError::AiResponseInvalid(_))));
    }

    #[test]
    fn into_questions_assigns_order_and_validates() {
        let quiz = parse_generated_quiz(&chat_response(QUIZ_JSON)).unwrap();
        let questions = quiz.into_questions().unwrap();

        assert_eq!(questions[0].order, 0);
        assert_eq!(questions[0].correct_option_ids().len(), 1);

        let invalid = GeneratedQuiz {
            title: "Broken".to_string(),
            description: None,
            questions: vec![GeneratedQuestion {
                prompt: "Pick one".to_string(),
                question_type: QuizQuestionType::Single,
                options: vec![GeneratedOption {
                    text: "Only".to_string(),
                    correct: true,
                    explanation: String::new(),
                }],
            }],
        };
        assert!(matches!(invalid.into_questions(), Err(AppError::AiResponseInvalid(_))));
    }

    #[test]
    fn oversized_generated_quiz_is_rejected() {
        let question = GeneratedQuestion {
            prompt: "True or false?".to_string(),
            question_type: QuizQuestionType::Bool,
            options: vec![
                GeneratedOption {
                    text: "True".to_string(),
                    correct: true,
                    explanation: String::new(),
                },
                GeneratedOption {
                    text: "False".to_string(),
                    correct: false,
                    explanation: String::new(),
                },
            ],
        };
        let quiz = GeneratedQuiz {
            title: "Long".to_string(),
            description: None,
            questions: vec![question; MAX_QUESTIONS + 1],
        };

        assert!(matches!(quiz.into_questions(), Err(AppError::AiResponseInvalid(_))));
    }
}

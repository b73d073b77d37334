use async_graphql::InputObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{quiz_question::QuizQuestionType, UserRole};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DirectorSignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConsumeInvitationRequest {
    #[validate(length(min = 1, max = 128))]
    pub token: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 200))]
    pub full_name: String,

    pub requested_role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSchoolRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 20))]
    pub grade_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeacherInvitationRequest {
    pub classroom_id: Option<String>,

    /// Defaults to seven days from now.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct QuizOptionInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    pub correct: bool,

    #[graphql(default)]
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct QuizQuestionInput {
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,

    pub question_type: QuizQuestionType,

    #[validate(length(min = 2, max = 6), nested)]
    pub options: Vec<QuizOptionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub classroom_id: String,

    #[validate(length(max = 20))]
    pub grade_level: Option<String>,

    #[validate(length(min = 1, max = 50), nested)]
    pub questions: Vec<QuizQuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 20, max = 20000))]
    pub lesson_text: String,

    #[validate(length(min = 1, max = 20))]
    pub grade_level: String,

    pub classroom_id: String,

    /// Overrides the configured default model.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetPublicationRequest {
    pub is_published: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct AnswerInput {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub child_name: String,

    #[validate(length(min = 1))]
    pub answers: Vec<AnswerInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_invitation_request_validation() {
        let request = ConsumeInvitationRequest {
            token: "abc".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            full_name: "Pat".to_string(),
            requested_role: UserRole::Parent,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_quiz_request_validates_nested_questions() {
        let request = CreateQuizRequest {
            title: "Fractions".to_string(),
            description: None,
            classroom_id: "class-1".to_string(),
            grade_level: None,
            questions: vec![QuizQuestionInput {
                prompt: "1/2 + 1/2?".to_string(),
                question_type: QuizQuestionType::Single,
                options: vec![QuizOptionInput {
                    text: "1".to_string(),
                    correct: true,
                    explanation: String::new(),
                }],
            }],
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submission_needs_answers() {
        let empty = SubmitQuizRequest {
            child_name: "Robin".to_string(),
            answers: Vec::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("answers"));

        let answered = SubmitQuizRequest {
            child_name: "Robin".to_string(),
            answers: vec![AnswerInput {
                question_id: "q-1".to_string(),
                selected_option_ids: vec!["o-1".to_string()],
            }],
        };
        assert!(answered.validate().is_ok());
    }

    #[test]
    fn test_requested_role_parses_from_json() {
        let json = r#"{
            "token": "abc",
            "email": "pat@example.com",
            "password": "long enough",
            "full_name": "Pat",
            "requested_role": "PARENT"
        }"#;

        let request: ConsumeInvitationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.requested_role, UserRole::Parent);
        assert!(request.validate().is_ok());
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{Classroom, InvitationToken, School, UserRole},
    services::onboarding_service::OnboardingOutcome,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl LoginResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub user_id: String,
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<OnboardingOutcome> for OnboardingResponse {
    fn from(outcome: OnboardingOutcome) -> Self {
        OnboardingResponse {
            user_id: outcome.user_id,
            role: outcome.role,
            school_id: outcome.school_id,
            classroom_id: outcome.classroom_id,
            warning: outcome.warning,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvitationDto {
    pub token: String,
    pub intended_role: UserRole,
    pub school_id: String,
    pub classroom_id: Option<String>,
    pub reusable: bool,
    pub expires_at: DateTime<Utc>,
}

impl From<InvitationToken> for InvitationDto {
    fn from(token: InvitationToken) -> Self {
        InvitationDto {
            token: token.token,
            intended_role: token.intended_role,
            school_id: token.school_id,
            classroom_id: token.classroom_id,
            reusable: token.reusable,
            expires_at: token.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolDto {
    pub id: String,
    pub name: String,
    pub director_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<School> for SchoolDto {
    fn from(school: School) -> Self {
        SchoolDto {
            id: school.id,
            name: school.name,
            director_id: school.director_id,
            created_at: school.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassroomDto {
    pub id: String,
    pub school_id: String,
    pub name: String,
    pub grade_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Classroom> for ClassroomDto {
    fn from(classroom: Classroom) -> Self {
        ClassroomDto {
            id: classroom.id,
            school_id: classroom.school_id,
            name: classroom.name,
            grade_level: classroom.grade_level,
            created_at: classroom.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_invitation_dto_hides_internal_ids() {
        let token = InvitationToken::reusable_parent(
            "class-1",
            "school-1",
            "teacher-1",
            Utc::now() + Duration::days(365),
        );
        let expected = token.token.clone();

        let json = serde_json::to_value(InvitationDto::from(token)).unwrap();
        assert_eq!(json["token"], expected);
        assert_eq!(json["intended_role"], "PARENT");
        assert!(json.get("created_by").is_none());
    }

    #[test]
    fn test_onboarding_response_omits_empty_warning() {
        let outcome = OnboardingOutcome {
            user_id: "user-1".to_string(),
            role: UserRole::Teacher,
            school_id: Some("school-1".to_string()),
            classroom_id: None,
            warning: None,
        };

        let json = serde_json::to_value(OnboardingResponse::from(outcome)).unwrap();
        assert!(json.get("warning").is_none());
        assert_eq!(json["role"], "TEACHER");
    }
}

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invitation token not found")]
    TokenNotFound,

    #[error("Invitation token has expired or was already used")]
    TokenExpiredOrUsed,

    #[error("Invalid invitation: {0}")]
    InvalidInvitation(String),

    #[error("Unsupported role: {0}")]
    UnsupportedRole(String),

    #[error("Failed to create identity: {0}")]
    IdentityCreationFailed(String),

    #[error("Failed to assign claims: {0}")]
    ClaimAssignmentFailed(String),

    #[error("Failed to persist profile: {0}")]
    ProfilePersistenceFailed(String),

    #[error("Invalid AI response: {0}")]
    AiResponseInvalid(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::TokenNotFound => "TOKEN_NOT_FOUND",
            AppError::TokenExpiredOrUsed => "TOKEN_EXPIRED_OR_USED",
            AppError::InvalidInvitation(_) => "INVALID_INVITATION",
            AppError::UnsupportedRole(_) => "UNSUPPORTED_ROLE",
            AppError::IdentityCreationFailed(_) => "IDENTITY_CREATION_FAILED",
            AppError::ClaimAssignmentFailed(_) => "CLAIM_ASSIGNMENT_FAILED",
            AppError::ProfilePersistenceFailed(_) => "PROFILE_PERSISTENCE_FAILED",
            AppError::AiResponseInvalid(_) => "AI_RESPONSE_INVALID",
            AppError::NotConfigured(_) => "NOT_CONFIGURED",
            AppError::Unexpected(_) => "UNEXPECTED",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::TokenNotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_)
            | AppError::InvalidInvitation(_)
            | AppError::UnsupportedRole(_)
            | AppError::IdentityCreationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::TokenExpiredOrUsed => StatusCode::GONE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::AiResponseInvalid(_) => StatusCode::BAD_GATEWAY,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_)
            | AppError::ClaimAssignmentFailed(_)
            | AppError::ProfilePersistenceFailed(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            kind: self.error_code(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Unexpected(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::Unexpected(err.message)
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Forbidden("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::TokenExpiredOrUsed.status_code(), StatusCode::GONE);
        assert_eq!(
            AppError::AiResponseInvalid("not json".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::NotConfigured("OPENAI_API_KEY".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_error_response_carries_kind() {
        let response = AppError::UnsupportedRole("DIRECTOR".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "UNSUPPORTED_ROLE");
        assert_eq!(json["code"], 400);
    }
}

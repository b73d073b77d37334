use actix_web::{post, web, HttpResponse};
use chrono::{Duration, Utc};

use crate::{
    app_state::AppState,
    auth::{require_classroom, AuthenticatedUser},
    errors::AppError,
    models::{
        domain::UserRole,
        dto::{
            request::{CreateClassroomRequest, CreateSchoolRequest, CreateTeacherInvitationRequest},
            response::{ApiResponse, ClassroomDto, InvitationDto, SchoolDto},
        },
    },
};

const TEACHER_INVITATION_DEFAULT_DAYS: i64 = 7;

#[post("/schools")]
pub async fn create_school(
    state: web::Data<AppState>,
    request: web::Json<CreateSchoolRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Director])?;

    let school = state
        .school_service
        .create_school(claims, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        SchoolDto::from(school),
        "School created; sign in again to refresh your access token",
    )))
}

#[post("/classrooms")]
pub async fn create_classroom(
    state: web::Data<AppState>,
    request: web::Json<CreateClassroomRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Director])?;

    let classroom = state
        .school_service
        .create_classroom(claims, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ClassroomDto::from(classroom)))
}

#[post("/invitations/teacher")]
pub async fn create_teacher_invitation(
    state: web::Data<AppState>,
    request: web::Json<CreateTeacherInvitationRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Director])?;
    let request = request.into_inner();

    let school_id = claims
        .school_id
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("Create a school before inviting teachers".to_string()))?;

    if let Some(classroom_id) = request.classroom_id.as_deref() {
        state.school_service.find_classroom(claims, classroom_id).await?;
    }

    let expires_at = request
        .expires_at
        .unwrap_or_else(|| Utc::now() + Duration::days(TEACHER_INVITATION_DEFAULT_DAYS));

    let token = state
        .invitation_service
        .create_single_use_invitation(
            school_id,
            request.classroom_id.as_deref(),
            UserRole::Teacher,
            &claims.user_id,
            expires_at,
        )
        .await?;
    Ok(HttpResponse::Created().json(InvitationDto::from(token)))
}

#[post("/classrooms/{id}/parent-invitation")]
pub async fn issue_parent_invitation(
    state: web::Data<AppState>,
    classroom_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Teacher])?;

    let classroom = state.school_service.find_classroom(claims, &classroom_id).await?;
    require_classroom(claims, &classroom.school_id, &classroom.id)?;

    let token = state
        .invitation_service
        .issue_or_reuse_parent_invitation(&classroom.id, &classroom.school_id, &claims.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(InvitationDto::from(token)))
}

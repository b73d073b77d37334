use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ConsumeInvitationRequest, DirectorSignupRequest, LoginRequest},
        response::{LoginResponse, OnboardingResponse},
    },
    services::ConsumeInvitation,
};

#[post("/auth/signup/director")]
pub async fn signup_director(
    state: web::Data<AppState>,
    request: web::Json<DirectorSignupRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let outcome = state
        .onboarding_service
        .register_director(&request.email, &request.password, &request.full_name)
        .await?;
    Ok(HttpResponse::Created().json(OnboardingResponse::from(outcome)))
}

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let token = state.credentials.sign_in(&request.email, &request.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse::bearer(token)))
}

#[post("/auth/invitations/consume")]
pub async fn consume_invitation(
    state: web::Data<AppState>,
    request: web::Json<ConsumeInvitationRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let outcome = state
        .onboarding_service
        .consume_invitation(ConsumeInvitation {
            token: request.token,
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            requested_role: request.requested_role,
        })
        .await?;
    Ok(HttpResponse::Created().json(OnboardingResponse::from(outcome)))
}

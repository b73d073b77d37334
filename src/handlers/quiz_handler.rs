use actix_web::{get, post, put, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::{
        domain::UserRole,
        dto::{
            quiz_dto::{QuizDto, SubmissionDto},
            request::{CreateQuizRequest, GenerateQuizRequest, SetPublicationRequest, SubmitQuizRequest},
        },
    },
};

#[post("/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Teacher])?;

    let quiz = state.quiz_service.create_quiz(claims, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(QuizDto::from_quiz(quiz, true, Utc::now())))
}

#[post("/quizzes/generate")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Teacher])?;

    let quiz = state.quiz_service.generate_quiz(claims, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(QuizDto::from_quiz(quiz, true, Utc::now())))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&auth.0, &quiz_id).await?;
    let reveal_answers = auth.0.role != UserRole::Parent;

    Ok(HttpResponse::Ok().json(QuizDto::from_quiz(quiz, reveal_answers, Utc::now())))
}

#[get("/classrooms/{id}/quizzes")]
pub async fn list_classroom_quizzes(
    state: web::Data<AppState>,
    classroom_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_service
        .list_classroom_quizzes(&auth.0, &classroom_id)
        .await?;
    let reveal_answers = auth.0.role != UserRole::Parent;
    let now = Utc::now();

    let response: Vec<QuizDto> = quizzes
        .into_iter()
        .map(|quiz| QuizDto::from_quiz(quiz, reveal_answers, now))
        .collect();
    Ok(HttpResponse::Ok().json(response))
}

#[put("/quizzes/{id}/publication")]
pub async fn set_publication(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SetPublicationRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Teacher])?;

    let quiz = state
        .quiz_service
        .set_published(claims, &quiz_id, request.is_published)
        .await?;
    Ok(HttpResponse::Ok().json(QuizDto::from_quiz(quiz, true, Utc::now())))
}

#[post("/quizzes/{id}/submissions")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Parent])?;

    let submission = state
        .submission_service
        .submit(claims, &quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(SubmissionDto::from(submission)))
}

#[get("/quizzes/{id}/submissions")]
pub async fn list_submissions(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let claims = auth.require(&[UserRole::Teacher, UserRole::Director])?;

    let submissions = state.submission_service.list_for_quiz(claims, &quiz_id).await?;
    let response: Vec<SubmissionDto> = submissions.into_iter().map(SubmissionDto::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

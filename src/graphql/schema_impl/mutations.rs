use async_graphql::{Context, Object, ID};
use chrono::Utc;

use crate::{
    auth::authorize,
    graphql::helpers::{gql, request_context},
    models::{
        domain::UserRole,
        dto::{
            quiz_dto::{QuizDto, SubmissionDto},
            request::{CreateQuizRequest, SubmitQuizRequest},
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_quiz(&self, ctx: &Context<'_>, input: CreateQuizRequest) -> async_graphql::Result<QuizDto> {
        let (state, claims) = gql(request_context(ctx))?;
        gql(authorize(Some(&claims), &[UserRole::Teacher]))?;

        let quiz = gql(state.quiz_service.create_quiz(&claims, input).await)?;
        Ok(QuizDto::from_quiz(quiz, true, Utc::now()))
    }

    /// Publishing opens a seven-day window; unpublishing clears it.
    async fn set_quiz_published(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        is_published: bool,
    ) -> async_graphql::Result<QuizDto> {
        let (state, claims) = gql(request_context(ctx))?;
        gql(authorize(Some(&claims), &[UserRole::Teacher]))?;

        let quiz = gql(
            state
                .quiz_service
                .set_published(&claims, &quiz_id, is_published)
                .await,
        )?;
        Ok(QuizDto::from_quiz(quiz, true, Utc::now()))
    }

    async fn submit_quiz(
        &self,
        ctx: &Context<'_>,
        quiz_id: ID,
        input: SubmitQuizRequest,
    ) -> async_graphql::Result<SubmissionDto> {
        let (state, claims) = gql(request_context(ctx))?;
        gql(authorize(Some(&claims), &[UserRole::Parent]))?;

        let submission = gql(state.submission_service.submit(&claims, &quiz_id, input).await)?;
        Ok(SubmissionDto::from(submission))
    }
}

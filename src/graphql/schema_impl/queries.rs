use async_graphql::{Context, Object, ID};
use chrono::Utc;

use crate::{
    auth::authorize,
    graphql::helpers::{gql, request_context},
    models::{
        domain::UserRole,
        dto::quiz_dto::{QuizDto, SubmissionDto},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn quiz(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<QuizDto> {
        let (state, claims) = gql(request_context(ctx))?;

        let quiz = gql(state.quiz_service.get_quiz(&claims, &id).await)?;
        let reveal_answers = claims.role != UserRole::Parent;

        Ok(QuizDto::from_quiz(quiz, reveal_answers, Utc::now()))
    }

    /// Parents only receive published quizzes.
    async fn classroom_quizzes(&self, ctx: &Context<'_>, classroom_id: ID) -> async_graphql::Result<Vec<QuizDto>> {
        let (state, claims) = gql(request_context(ctx))?;

        let quizzes = gql(
            state
                .quiz_service
                .list_classroom_quizzes(&claims, &classroom_id)
                .await,
        )?;
        let reveal_answers = claims.role != UserRole::Parent;
        let now = Utc::now();

        Ok(quizzes
            .into_iter()
            .map(|quiz| QuizDto::from_quiz(quiz, reveal_answers, now))
            .collect())
    }

    async fn quiz_submissions(&self, ctx: &Context<'_>, quiz_id: ID) -> async_graphql::Result<Vec<SubmissionDto>> {
        let (state, claims) = gql(request_context(ctx))?;
        gql(authorize(Some(&claims), &[UserRole::Teacher, UserRole::Director]))?;

        let submissions = gql(state.submission_service.list_for_quiz(&claims, &quiz_id).await)?;
        Ok(submissions.into_iter().map(SubmissionDto::from).collect())
    }
}

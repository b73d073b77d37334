use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{
        quiz_question::{QuizQuestionOption, QuizQuestionType},
        submission::SubmittedAnswer,
        PublicationState, Quiz, QuizQuestion, QuizSubmission,
    },
    services::quiz_lifecycle::{is_expiring_soon, time_remaining},
};

/// Answer keys are only revealed to staff; parents see the options alone.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizOptionDto {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizOptionDto {
    fn from_option(option: QuizQuestionOption, reveal_answers: bool) -> Self {
        QuizOptionDto {
            id: option.id,
            text: option.text,
            correct: reveal_answers.then_some(option.correct),
            explanation: reveal_answers.then_some(option.explanation),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizQuestionDto {
    pub id: String,
    pub prompt: String,
    pub question_type: QuizQuestionType,
    pub order: i16,
    pub options: Vec<QuizOptionDto>,
}

impl QuizQuestionDto {
    fn from_question(question: QuizQuestion, reveal_answers: bool) -> Self {
        QuizQuestionDto {
            id: question.id,
            prompt: question.prompt,
            question_type: question.question_type,
            order: question.order,
            options: question
                .options
                .into_iter()
                .map(|option| QuizOptionDto::from_option(option, reveal_answers))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub classroom_id: String,
    pub school_id: String,
    pub grade_level: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub unpublish_date: Option<DateTime<Utc>>,
    /// "Expired" once the window has passed; absent for drafts.
    pub time_remaining: Option<String>,
    pub expiring_soon: bool,
    pub questions: Vec<QuizQuestionDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizDto {
    pub fn from_quiz(quiz: Quiz, reveal_answers: bool, now: DateTime<Utc>) -> Self {
        let (time_remaining, expiring_soon) = match quiz.publication_state() {
            PublicationState::Published(window) => (
                Some(time_remaining(window.unpublish_date, now).to_string()),
                is_expiring_soon(window.unpublish_date, now),
            ),
            PublicationState::Draft => (None, false),
        };

        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            classroom_id: quiz.classroom_id,
            school_id: quiz.school_id,
            grade_level: quiz.grade_level,
            is_published: quiz.is_published,
            published_at: quiz.published_at,
            unpublish_date: quiz.unpublish_date,
            time_remaining,
            expiring_soon,
            questions: quiz
                .questions
                .into_iter()
                .map(|question| QuizQuestionDto::from_question(question, reveal_answers))
                .collect(),
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AnswerResultDto {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    pub is_correct: bool,
}

impl From<SubmittedAnswer> for AnswerResultDto {
    fn from(answer: SubmittedAnswer) -> Self {
        AnswerResultDto {
            question_id: answer.question_id,
            selected_option_ids: answer.selected_option_ids,
            is_correct: answer.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionDto {
    pub id: String,
    pub quiz_id: String,
    pub child_name: String,
    pub score: i16,
    pub total: i16,
    pub answers: Vec<AnswerResultDto>,
    pub submitted_at: DateTime<Utc>,
}

impl From<QuizSubmission> for SubmissionDto {
    fn from(submission: QuizSubmission) -> Self {
        SubmissionDto {
            id: submission.id,
            quiz_id: submission.quiz_id,
            child_name: submission.child_name,
            score: submission.score,
            total: submission.total,
            answers: submission.answers.into_iter().map(Into::into).collect(),
            submitted_at: submission.submitted_at,
        }
    }
}

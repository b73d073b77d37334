use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{require_classroom, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::NewQuiz,
            quiz_question::{question_order, QuizQuestion, QuizQuestionOption},
            Quiz, UserRole,
        },
        dto::request::{CreateQuizRequest, GenerateQuizRequest, QuizQuestionInput},
    },
    repositories::QuizRepository,
    services::{quiz_generator::QuizGenerator, quiz_lifecycle::publication_for},
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    generator: Option<Arc<dyn QuizGenerator>>,
    default_model: String,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        generator: Option<Arc<dyn QuizGenerator>>,
        default_model: String,
    ) -> Self {
        Self {
            repository,
            generator,
            default_model,
        }
    }

    pub async fn create_quiz(&self, claims: &Claims, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;
        let school_id = scoped_school(claims, &request.classroom_id)?;

        let questions = request
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, input)| question_from_input(index, input))
            .collect::<AppResult<Vec<_>>>()?;

        let quiz = Quiz::new_draft(NewQuiz {
            title: request.title.trim().to_string(),
            description: request.description,
            classroom_id: request.classroom_id,
            school_id,
            created_by: claims.user_id.clone(),
            grade_level: request.grade_level,
            questions,
        });

        let created = self.repository.insert(quiz).await?;
        log::info!("Quiz {} created in classroom {}", created.id, created.classroom_id);

        Ok(created)
    }

    /// Stores the generated quiz as a draft for the teacher to review.
    pub async fn generate_quiz(&self, claims: &Claims, request: GenerateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;
        let school_id = scoped_school(claims, &request.classroom_id)?;

        let generator = self.generator.as_ref().ok_or_else(|| {
            AppError::NotConfigured("Quiz generation requires OPENAI_API_KEY".to_string())
        })?;
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        let generated = generator
            .generate_quiz(&request.lesson_text, &request.grade_level, model)
            .await?;
        let title = generated.title.trim().to_string();
        let description = generated.description.clone();
        let questions = generated.into_questions()?;

        let quiz = Quiz::new_draft(NewQuiz {
            title,
            description,
            classroom_id: request.classroom_id,
            school_id,
            created_by: claims.user_id.clone(),
            grade_level: Some(request.grade_level),
            questions,
        });

        let created = self.repository.insert(quiz).await?;
        log::info!(
            "Generated quiz {} with {} questions for classroom {}",
            created.id,
            created.questions.len(),
            created.classroom_id
        );

        Ok(created)
    }

    /// Parents never see drafts; for them a draft does not exist.
    pub async fn get_quiz(&self, claims: &Claims, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        require_classroom(claims, &quiz.school_id, &quiz.classroom_id)?;

        if claims.role == UserRole::Parent && !quiz.is_published {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)));
        }

        Ok(quiz)
    }

    pub async fn list_classroom_quizzes(&self, claims: &Claims, classroom_id: &str) -> AppResult<Vec<Quiz>> {
        let school_id = scoped_school(claims, classroom_id)?;
        let published_only = claims.role == UserRole::Parent;

        let quizzes = self
            .repository
            .list_by_classroom(classroom_id, published_only)
            .await?
            .into_iter()
            .filter(|quiz| quiz.school_id == school_id)
            .collect();

        Ok(quizzes)
    }

    /// Publishing opens a fresh seven-day window; unpublishing clears it.
    pub async fn set_published(&self, claims: &Claims, quiz_id: &str, is_published: bool) -> AppResult<Quiz> {
        self.get_quiz(claims, quiz_id).await?;
        self.set_published_at(quiz_id, is_published, Utc::now()).await
    }

    pub async fn set_published_at(
        &self,
        quiz_id: &str,
        is_published: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .set_publication(quiz_id, publication_for(is_published, now), now)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        log::info!(
            "Quiz {} {}",
            quiz.id,
            if quiz.is_published { "published" } else { "unpublished" }
        );

        Ok(quiz)
    }

    /// Unpublishes every quiz whose window closed at or before `now`.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let count = self.repository.unpublish_expired(now).await?;

        if count > 0 {
            log::info!("Unpublished {} expired quizzes", count);
        } else {
            log::debug!("No expired quizzes to unpublish");
        }

        Ok(count)
    }
}

/// Resolves the caller's school and checks they may reach `classroom_id`.
fn scoped_school(claims: &Claims, classroom_id: &str) -> AppResult<String> {
    let school_id = claims
        .school_id
        .clone()
        .ok_or_else(|| AppError::Forbidden("Your account is not attached to a school".to_string()))?;

    require_classroom(claims, &school_id, classroom_id)?;
    Ok(school_id)
}

fn question_from_input(index: usize, input: QuizQuestionInput) -> AppResult<QuizQuestion> {
    let question = QuizQuestion {
        id: Uuid::new_v4().to_string(),
        prompt: input.prompt.trim().to_string(),
        question_type: input.question_type,
        options: input
            .options
            .into_iter()
            .map(|option| QuizQuestionOption {
                id: Uuid::new_v4().to_string(),
                text: option.text,
                correct: option.correct,
                explanation: option.explanation,
            })
            .collect(),
        order: question_order(index).map_err(AppError::ValidationError)?,
    };

    question.validate_options().map_err(AppError::ValidationError)?;
    Ok(question)
}

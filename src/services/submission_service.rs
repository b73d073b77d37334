use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz_question::QuizQuestionType, submission::SubmittedAnswer, Quiz, QuizQuestion,
            QuizSubmission, UserRole,
        },
        dto::request::{AnswerInput, SubmitQuizRequest},
    },
    repositories::SubmissionRepository,
    services::quiz_service::QuizService,
};

pub struct SubmissionService {
    repository: Arc<dyn SubmissionRepository>,
    quizzes: Arc<QuizService>,
}

impl SubmissionService {
    pub fn new(repository: Arc<dyn SubmissionRepository>, quizzes: Arc<QuizService>) -> Self {
        Self { repository, quizzes }
    }

    /// Grades and stores a parent's answers to a published quiz of their classroom.
    pub async fn submit(
        &self,
        claims: &Claims,
        quiz_id: &str,
        request: SubmitQuizRequest,
    ) -> AppResult<QuizSubmission> {
        request.validate()?;

        let quiz = self.quizzes.get_quiz(claims, quiz_id).await?;
        if !quiz.is_published {
            return Err(AppError::ValidationError(
                "Quiz is not open for submissions".to_string(),
            ));
        }

        let (score, answers) = grade_submission(&quiz, &request.answers)?;
        let total = i16::try_from(quiz.questions.len())
            .map_err(|_| AppError::Unexpected(format!("Quiz {} has too many questions", quiz.id)))?;
        let submission = QuizSubmission {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            parent_id: claims.user_id.clone(),
            child_name: request.child_name.trim().to_string(),
            answers,
            score,
            total,
            submitted_at: Utc::now(),
        };

        let created = self.repository.insert(submission).await?;
        log::info!(
            "Submission {} for quiz {} scored {}/{}",
            created.id,
            created.quiz_id,
            created.score,
            created.total
        );

        Ok(created)
    }

    pub async fn list_for_quiz(&self, claims: &Claims, quiz_id: &str) -> AppResult<Vec<QuizSubmission>> {
        if claims.role == UserRole::Parent {
            return Err(AppError::Forbidden(
                "Parents cannot list classroom submissions".to_string(),
            ));
        }

        let quiz = self.quizzes.get_quiz(claims, quiz_id).await?;
        self.repository.list_by_quiz(&quiz.id).await
    }
}

/// Scores one point per fully correct question. Unanswered questions score zero.
pub fn grade_submission(quiz: &Quiz, submitted: &[AnswerInput]) -> AppResult<(i16, Vec<SubmittedAnswer>)> {
    let questions: HashMap<&str, &QuizQuestion> =
        quiz.questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let mut score: i16 = 0;
    let mut answers = Vec::with_capacity(submitted.len());

    for answer in submitted {
        let question = questions.get(answer.question_id.as_str()).ok_or_else(|| {
            AppError::ValidationError(format!("Question '{}' is not part of this quiz", answer.question_id))
        })?;

        if answers
            .iter()
            .any(|graded: &SubmittedAnswer| graded.question_id == answer.question_id)
        {
            return Err(AppError::ValidationError(format!(
                "Question '{}' was answered more than once",
                answer.question_id
            )));
        }

        let is_correct = grade_question(question, &answer.selected_option_ids);
        if is_correct {
            score += 1;
        }

        answers.push(SubmittedAnswer {
            question_id: answer.question_id.clone(),
            selected_option_ids: answer.selected_option_ids.clone(),
            is_correct,
        });
    }

    Ok((score, answers))
}

fn grade_question(question: &QuizQuestion, selected: &[String]) -> bool {
    let correct = question.correct_option_ids();

    match question.question_type {
        QuizQuestionType::Single | QuizQuestionType::Bool => {
            selected.len() == 1 && correct.len() == 1 && selected[0] == correct[0]
        }
        // every correct option and nothing else
        QuizQuestionType::Multi => {
            !correct.is_empty()
                && correct.iter().all(|id| selected.iter().any(|s| s.as_str() == *id))
                && selected.iter().all(|s| correct.contains(&s.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{quiz_question::QuizQuestionOption, PublicationWindow},
        repositories::{
            quiz_repository::MockQuizRepository, submission_repository::MockSubmissionRepository,
        },
    };

    fn option(id: &str, correct: bool) -> QuizQuestionOption {
        QuizQuestionOption {
            id: id.to_string(),
            text: id.to_string(),
            correct,
            explanation: String::new(),
        }
    }

    fn graded_quiz() -> Quiz {
        let mut quiz = Quiz::test_quiz("class-1");
        quiz.questions = vec![
            QuizQuestion {
                id: "single".to_string(),
                prompt: "2 + 2?".to_string(),
                question_type: QuizQuestionType::Single,
                options: vec![option("s-a", true), option("s-b", false)],
                order: 0,
            },
            QuizQuestion {
                id: "multi".to_string(),
                prompt: "Even numbers?".to_string(),
                question_type: QuizQuestionType::Multi,
                options: vec![option("m-a", true), option("m-b", false), option("m-c", true)],
                order: 1,
            },
        ];
        quiz
    }

    fn answer(question_id: &str, selected: &[&str]) -> AnswerInput {
        AnswerInput {
            question_id: question_id.to_string(),
            selected_option_ids: selected.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn grades_single_and_multi_questions() {
        let quiz = graded_quiz();

        let (score, answers) = grade_submission(
            &quiz,
            &[answer("single", &["s-a"]), answer("multi", &["m-a", "m-c"])],
        )
        .unwrap();
        assert_eq!(score, 2);
        assert!(answers.iter().all(|a| a.is_correct));

        let (score, _) = grade_submission(
            &quiz,
            &[answer("single", &["s-b"]), answer("multi", &["m-a", "m-b", "m-c"])],
        )
        .unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn rejects_unknown_and_duplicate_questions() {
        let quiz = graded_quiz();

        let unknown = grade_submission(&quiz, &[answer("nope", &["x"])]);
        assert!(matches!(unknown, Err(AppError::ValidationError(_))));

        let duplicate = grade_submission(&quiz, &[answer("single", &["s-a"]), answer("single", &["s-b"])]);
        assert!(matches!(duplicate, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn parent_submission_is_graded_and_stored() {
        let now = Utc::now();
        let mut quiz = graded_quiz();
        quiz.apply_publication(Some(PublicationWindow::starting_at(now)), now);
        let quiz_id = quiz.id.clone();

        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(move |_| Ok(Some(quiz.clone())));

        let mut submissions = MockSubmissionRepository::new();
        submissions
            .expect_insert()
            .withf(|s| s.parent_id == "parent-user" && s.score == 1 && s.total == 2)
            .returning(Ok);

        let quiz_service = Arc::new(QuizService::new(Arc::new(quizzes), None, "gpt-4o-mini".to_string()));
        let service = SubmissionService::new(Arc::new(submissions), quiz_service);
        let claims = Claims::test_claims(UserRole::Parent, Some("school-1"), Some("class-1"));

        let request = SubmitQuizRequest {
            child_name: "Sam".to_string(),
            answers: vec![answer("single", &["s-a"])],
        };

        let submission = service.submit(&claims, &quiz_id, request).await.unwrap();
        assert_eq!(submission.child_name, "Sam");
    }

    #[tokio::test]
    async fn parents_cannot_list_submissions() {
        let quiz_service = Arc::new(QuizService::new(
            Arc::new(MockQuizRepository::new()),
            None,
            "gpt-4o-mini".to_string(),
        ));
        let service = SubmissionService::new(Arc::new(MockSubmissionRepository::new()), quiz_service);
        let claims = Claims::test_claims(UserRole::Parent, Some("school-1"), Some("class-1"));

        let result = service.list_for_quiz(&claims, "quiz-1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}

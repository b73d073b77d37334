#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use crate::{
        app_state::{AppState, Repositories},
        config::Config,
        models::domain::{PublicationWindow, Quiz},
        repositories::{
            invitation_token_repository::MockInvitationTokenRepository,
            profile_repository::MockProfileRepository,
            quiz_repository::MockQuizRepository,
            school_repository::{MockClassroomRepository, MockSchoolRepository},
            submission_repository::MockSubmissionRepository,
        },
        services::credential_store::MockCredentialStore,
    };

    /// A quiz published at `published_at` with the standard window.
    pub fn published_quiz(classroom_id: &str, published_at: DateTime<Utc>) -> Quiz {
        let mut quiz = Quiz::test_quiz(classroom_id);
        quiz.apply_publication(Some(PublicationWindow::starting_at(published_at)), published_at);
        quiz
    }

    /// Mocked collaborators; unset expectations fail the test if called.
    #[derive(Default)]
    pub struct MockCollaborators {
        pub credentials: MockCredentialStore,
        pub invitations: MockInvitationTokenRepository,
        pub profiles: MockProfileRepository,
        pub quizzes: MockQuizRepository,
        pub schools: MockSchoolRepository,
        pub classrooms: MockClassroomRepository,
        pub submissions: MockSubmissionRepository,
    }

    impl MockCollaborators {
        pub fn into_state(self) -> AppState {
            let repositories = Repositories {
                invitations: Arc::new(self.invitations),
                profiles: Arc::new(self.profiles),
                quizzes: Arc::new(self.quizzes),
                schools: Arc::new(self.schools),
                classrooms: Arc::new(self.classrooms),
                submissions: Arc::new(self.submissions),
            };

            AppState::assemble(Config::test_config(), repositories, Arc::new(self.credentials), None)
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::fixtures::*;

    #[test]
    fn test_published_quiz_fixture_keeps_window_pairing() {
        let now = Utc::now();
        let quiz = published_quiz("class-1", now);

        assert!(quiz.is_published);
        assert_eq!(quiz.unpublish_date, Some(now + Duration::days(7)));
    }
}

use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ClassroomRepository, InvitationTokenRepository, MongoClassroomRepository,
        MongoInvitationTokenRepository, MongoProfileRepository, MongoQuizRepository,
        MongoSchoolRepository, MongoSubmissionRepository, ProfileRepository, QuizRepository,
        SchoolRepository, SubmissionRepository,
    },
    services::{
        CredentialStore, InvitationService, MongoCredentialStore, OnboardingService,
        OpenAiQuizGenerator, QuizGenerator, QuizService, SchoolService, SubmissionService,
    },
};

/// The storage collaborators the services are built from.
pub struct Repositories {
    pub invitations: Arc<dyn InvitationTokenRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub schools: Arc<dyn SchoolRepository>,
    pub classrooms: Arc<dyn ClassroomRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when assembled over in-memory collaborators.
    pub database: Option<Database>,
    pub credentials: Arc<dyn CredentialStore>,
    pub invitation_service: Arc<InvitationService>,
    pub onboarding_service: Arc<OnboardingService>,
    pub quiz_service: Arc<QuizService>,
    pub school_service: Arc<SchoolService>,
    pub submission_service: Arc<SubmissionService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let invitations = Arc::new(MongoInvitationTokenRepository::new(&db));
        invitations.ensure_indexes().await?;
        let profiles = Arc::new(MongoProfileRepository::new(&db));
        profiles.ensure_indexes().await?;
        let quizzes = Arc::new(MongoQuizRepository::new(&db));
        quizzes.ensure_indexes().await?;
        let schools = Arc::new(MongoSchoolRepository::new(&db));
        schools.ensure_indexes().await?;
        let classrooms = Arc::new(MongoClassroomRepository::new(&db));
        classrooms.ensure_indexes().await?;
        let submissions = Arc::new(MongoSubmissionRepository::new(&db));
        submissions.ensure_indexes().await?;

        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let credentials = Arc::new(MongoCredentialStore::new(&db, jwt));
        credentials.ensure_indexes().await?;

        let generator: Option<Arc<dyn QuizGenerator>> = match &config.openai_api_key {
            Some(key) => Some(Arc::new(OpenAiQuizGenerator::new(key))),
            None => {
                log::warn!("OPENAI_API_KEY not set; quiz generation is disabled");
                None
            }
        };

        let repositories = Repositories {
            invitations,
            profiles,
            quizzes,
            schools,
            classrooms,
            submissions,
        };

        let mut state = Self::assemble(config, repositories, credentials, generator);
        state.database = Some(db);
        Ok(state)
    }

    /// Wires the services over the given collaborators.
    pub fn assemble(
        config: Config,
        repositories: Repositories,
        credentials: Arc<dyn CredentialStore>,
        generator: Option<Arc<dyn QuizGenerator>>,
    ) -> Self {
        let invitation_service = Arc::new(InvitationService::new(
            repositories.invitations,
            config.parent_invitation_ttl_days,
        ));
        let onboarding_service = Arc::new(OnboardingService::new(
            Arc::clone(&credentials),
            Arc::clone(&repositories.profiles),
            Arc::clone(&invitation_service),
        ));
        let quiz_service = Arc::new(QuizService::new(
            repositories.quizzes,
            generator,
            config.openai_model.clone(),
        ));
        let school_service = Arc::new(SchoolService::new(
            repositories.schools,
            repositories.classrooms,
            repositories.profiles,
            Arc::clone(&credentials),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            repositories.submissions,
            Arc::clone(&quiz_service),
        ));

        Self {
            config: Arc::new(config),
            database: None,
            credentials,
            invitation_service,
            onboarding_service,
            quiz_service,
            school_service,
            submission_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}

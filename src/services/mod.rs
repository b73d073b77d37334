pub mod credential_store;
pub mod expiry_sweeper;
pub mod invitation_service;
pub mod onboarding_service;
pub mod quiz_generator;
pub mod quiz_lifecycle;
pub mod quiz_service;
pub mod saga;
pub mod school_service;
pub mod submission_service;

pub use credential_store::{CredentialStore, MongoCredentialStore};
pub use expiry_sweeper::ExpirySweeper;
pub use invitation_service::InvitationService;
pub use onboarding_service::{ConsumeInvitation, OnboardingOutcome, OnboardingService};
pub use quiz_generator::{OpenAiQuizGenerator, QuizGenerator};
pub use quiz_service::QuizService;
pub use school_service::SchoolService;
pub use submission_service::SubmissionService;

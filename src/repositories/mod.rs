pub mod invitation_token_repository;
pub mod profile_repository;
pub mod quiz_repository;
pub mod school_repository;
pub mod submission_repository;

pub use invitation_token_repository::{InvitationTokenRepository, MongoInvitationTokenRepository};
pub use profile_repository::{MongoProfileRepository, ProfileRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use school_repository::{
    ClassroomRepository, MongoClassroomRepository, MongoSchoolRepository, SchoolRepository,
};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};

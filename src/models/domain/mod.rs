pub mod identity;
pub mod invitation_token;
pub mod quiz;
pub mod quiz_question;
pub mod school;
pub mod submission;
pub mod user;
pub use identity::Identity;
pub use invitation_token::{InvitationGrant, InvitationToken};
pub use quiz::{PublicationState, PublicationWindow, Quiz};
pub use quiz_question::QuizQuestion;
pub use school::{Classroom, School};
pub use submission::QuizSubmission;
pub use user::{ClaimSet, Profile, UserRole};

mod challenge_repository;
mod submission_repository;
mod user_profile_repository;

pub use challenge_repository::{
    ChallengeRecord, ChallengeRepository, ChallengeUpdate, NewChallenge, SeaOrmChallengeRepository,
};
pub use submission_repository::{
    NewSubmission, SeaOrmSubmissionRepository, SubmissionRecord, SubmissionRepository,
};
pub use user_profile_repository::{
    NewUserProfile, SeaOrmUserProfileRepository, UserProfileRecord, UserProfileRepository,
};

use flagforge_core::domain::{ChallengeId, DomainError, UserEmail};
use thiserror::Error;

/// Failures surfaced by [`super::CtfService`].
///
/// A wrong flag is not an error; it comes back as a `SubmitResult` with
/// `success == false`.
#[derive(Debug, Error)]
pub enum CtfError {
    #[error("challenge not found: {0}")]
    NotFound(String),

    #[error("challenge is not active: {0}")]
    Inactive(ChallengeId),

    #[error("challenge {challenge_id} already solved by {user_email}")]
    AlreadySolved {
        challenge_id: ChallengeId,
        user_email: UserEmail,
    },

    #[error("admin privileges required for {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("too many attempts: at most {max_attempts} per {window_secs}s")]
    RateLimited { max_attempts: u32, window_secs: u64 },

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl CtfError {
    pub(crate) fn challenge_not_found(challenge_id: ChallengeId) -> Self {
        Self::NotFound(challenge_id.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CtfError>;

use chrono::{DateTime, Utc};
use flagforge_core::domain::{ChallengeId, DomainError, UserEmail};
use tracing::{debug, info};

use super::{AttemptPolicy, CtfError, CtfService, Result};
use crate::events::SolveEvent;
use crate::repository::NewSubmission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    pub success: bool,
    pub points_awarded: u32,
    pub first_blood: bool,
    pub bonus_points: u32,
}

impl CtfService {
    /// Checks a flag attempt and appends it to the ledger.
    ///
    /// Rejections (`NotFound`, `Inactive`, `AlreadySolved`, `RateLimited`,
    /// `Validation`) leave the ledger untouched. A wrong flag is recorded and
    /// returned as `success == false`.
    #[tracing::instrument(skip(self, flag_text))]
    pub async fn submit_flag(
        &self,
        challenge_id: ChallengeId,
        user_email: &str,
        flag_text: &str,
    ) -> Result<SubmitResult> {
        let user_email = UserEmail::parse(user_email)?;
        if flag_text.trim().is_empty() {
            return Err(DomainError::EmptyFlag.into());
        }

        // Everything below reads the ledger and then writes to it.
        let _guard = self.locks.acquire(challenge_id).await;

        let challenge = self
            .challenges
            .find_by_id(challenge_id)
            .await?
            .ok_or_else(|| CtfError::challenge_not_found(challenge_id))?;

        if !challenge.is_active {
            return Err(CtfError::Inactive(challenge_id));
        }

        if self.submissions.has_correct(challenge_id, &user_email).await? {
            return Err(CtfError::AlreadySolved {
                challenge_id,
                user_email,
            });
        }

        let now = self.clock.now();
        self.enforce_attempt_policy(challenge_id, &user_email, now)
            .await?;

        let correct = challenge.flag.matches(flag_text);
        let first_blood = correct && !self.submissions.any_correct(challenge_id).await?;
        let award = challenge.points.award(correct, first_blood);

        let record = self
            .submissions
            .append(NewSubmission {
                challenge_id,
                user_email: user_email.clone(),
                is_correct: correct,
                submitted_flag: flag_text.to_string(),
                submitted_at: now,
                points_earned: award.points_awarded,
                is_first_blood: award.first_blood,
            })
            .await?;

        info!(
            submission_id = %record.id,
            user_email = %user_email,
            correct,
            first_blood = award.first_blood,
            points = award.points_awarded,
            "flag submission recorded"
        );

        if correct {
            self.events.emit(SolveEvent {
                challenge_id,
                challenge_title: challenge.title,
                user_email,
                points_awarded: award.points_awarded,
                first_blood: award.first_blood,
                solved_at: now,
            });
        }

        Ok(SubmitResult {
            success: correct,
            points_awarded: award.points_awarded,
            first_blood: award.first_blood,
            bonus_points: award.bonus_points,
        })
    }

    async fn enforce_attempt_policy(
        &self,
        challenge_id: ChallengeId,
        user_email: &UserEmail,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let Some(since) = self.policy.window_start(now) else {
            return Ok(());
        };

        let attempts = self
            .submissions
            .count_attempts_since(challenge_id, user_email, since)
            .await?;

        match self.policy {
            AttemptPolicy::Limited {
                max_attempts,
                window_secs,
            } if !self.policy.allows(attempts) => {
                debug!(user_email = %user_email, attempts, "attempt limit reached");
                Err(CtfError::RateLimited {
                    max_attempts,
                    window_secs,
                })
            }
            _ => Ok(()),
        }
    }
}

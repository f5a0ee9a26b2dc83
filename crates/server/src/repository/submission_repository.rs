use crate::entity::submission;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flagforge_core::domain::{ChallengeId, Solve, SubmissionId, UserEmail};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub challenge_id: ChallengeId,
    pub user_email: UserEmail,
    pub is_correct: bool,
    pub submitted_flag: String,
    pub submitted_at: DateTime<Utc>,
    pub points_earned: u32,
    pub is_first_blood: bool,
}

impl SubmissionRecord {
    /// The ledger entry as seen by the aggregations, if it was a solve.
    pub fn as_solve(&self) -> Option<Solve> {
        self.is_correct.then(|| Solve {
            challenge_id: self.challenge_id,
            user_email: self.user_email.clone(),
            solved_at: self.submitted_at,
            points: self.points_earned,
            first_blood: self.is_first_blood,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub challenge_id: ChallengeId,
    pub user_email: UserEmail,
    pub is_correct: bool,
    pub submitted_flag: String,
    pub submitted_at: DateTime<Utc>,
    pub points_earned: u32,
    pub is_first_blood: bool,
}

/// Append-only ledger of flag attempts.
///
/// Correct-entry queries return rows oldest first, the recorded first blood
/// ahead of any entry sharing its timestamp.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn append(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn has_correct(&self, challenge_id: ChallengeId, user_email: &UserEmail) -> Result<bool>;
    async fn any_correct(&self, challenge_id: ChallengeId) -> Result<bool>;
    async fn count_attempts_since(
        &self,
        challenge_id: ChallengeId,
        user_email: &UserEmail,
        since: DateTime<Utc>,
    ) -> Result<u64>;
    async fn list_correct(&self) -> Result<Vec<SubmissionRecord>>;
    async fn list_correct_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>>;
    async fn list_by_user(&self, user_email: &UserEmail) -> Result<Vec<SubmissionRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        let id = SubmissionId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", model.id))?;
        let challenge_id = ChallengeId::from_str(&model.challenge_id).map_err(|e| {
            anyhow!(
                "invalid submission.challenge_id '{}' from database: {e}",
                model.challenge_id
            )
        })?;
        let user_email = UserEmail::parse(&model.user_email).map_err(|e| {
            anyhow!(
                "invalid submission.user_email '{}' from database: {e}",
                model.user_email
            )
        })?;
        let points_earned = u32::try_from(model.points_earned).map_err(|_| {
            anyhow!(
                "invalid submission.points_earned from database: {} (must be non-negative)",
                model.points_earned
            )
        })?;

        Ok(SubmissionRecord {
            id,
            challenge_id,
            user_email,
            is_correct: model.is_correct,
            submitted_flag: model.submitted_flag,
            submitted_at: model.submitted_at,
            points_earned,
            is_first_blood: model.is_first_blood,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn append(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let id = SubmissionId::new();

        let active_model = submission::ActiveModel {
            id: Set(id.to_string()),
            challenge_id: Set(new_submission.challenge_id.to_string()),
            user_email: Set(new_submission.user_email.to_string()),
            is_correct: Set(new_submission.is_correct),
            submitted_flag: Set(new_submission.submitted_flag),
            submitted_at: Set(new_submission.submitted_at),
            points_earned: Set(i32::try_from(new_submission.points_earned)?),
            is_first_blood: Set(new_submission.is_first_blood),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn has_correct(&self, challenge_id: ChallengeId, user_email: &UserEmail) -> Result<bool> {
        let count = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .filter(submission::Column::UserEmail.eq(user_email.as_str()))
            .filter(submission::Column::IsCorrect.eq(true))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn any_correct(&self, challenge_id: ChallengeId) -> Result<bool> {
        let count = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .filter(submission::Column::IsCorrect.eq(true))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn count_attempts_since(
        &self,
        challenge_id: ChallengeId,
        user_email: &UserEmail,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        let count = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .filter(submission::Column::UserEmail.eq(user_email.as_str()))
            .filter(submission::Column::SubmittedAt.gte(since))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn list_correct(&self) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::IsCorrect.eq(true))
            .order_by_asc(submission::Column::SubmittedAt)
            .order_by_desc(submission::Column::IsFirstBlood)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_correct_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::ChallengeId.eq(challenge_id.to_string()))
            .filter(submission::Column::IsCorrect.eq(true))
            .order_by_asc(submission::Column::SubmittedAt)
            .order_by_desc(submission::Column::IsFirstBlood)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_by_user(&self, user_email: &UserEmail) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::UserEmail.eq(user_email.as_str()))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}

use std::collections::{HashMap, HashSet};

use flagforge_core::domain::{
    Category, ChallengeId, ChallengeTitle, Difficulty, Flag, FlagFormat, Points, UserEmail,
};
use tracing::info;

use super::{CtfError, CtfService, Result};
use crate::repository::{ChallengeRecord, ChallengeUpdate, NewChallenge, SubmissionRecord};

/// Unvalidated input for a new challenge.
#[derive(Debug, Clone)]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub flag: String,
    pub flag_format: String,
    pub difficulty: String,
    pub category: String,
    pub points: i64,
    pub is_active: bool,
}

/// Unvalidated partial update.
#[derive(Debug, Clone, Default)]
pub struct ChallengePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub flag: Option<String>,
    pub flag_format: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub points: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ChallengeView {
    pub challenge: ChallengeRecord,
    pub solve_count: u32,
    pub solved_by_viewer: bool,
    reveal_flag: bool,
}

impl ChallengeView {
    /// The real flag for admins, a fixed mask for everyone else.
    pub fn displayed_flag(&self) -> &str {
        if self.reveal_flag {
            self.challenge.flag.as_str()
        } else {
            Flag::MASK
        }
    }
}

struct Viewer {
    email: Option<UserEmail>,
    is_admin: bool,
}

impl CtfService {
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_challenge(
        &self,
        admin_email: &str,
        draft: ChallengeDraft,
    ) -> Result<ChallengeRecord> {
        let admin = self.require_admin(admin_email, "create challenge").await?;

        let new_challenge = NewChallenge {
            title: ChallengeTitle::new(draft.title)?,
            description: draft.description,
            flag: Flag::new(draft.flag)?,
            flag_format: FlagFormat::new(draft.flag_format)?.into_inner(),
            difficulty: draft.difficulty.parse::<Difficulty>()?,
            category: draft.category.parse::<Category>()?,
            points: Points::new(draft.points)?,
            is_active: draft.is_active,
            created_by: admin,
            created_at: self.clock.now(),
        };

        let record = self.challenges.create(new_challenge).await?;
        info!(challenge_id = %record.id, created_by = %record.created_by, "challenge created");
        Ok(record)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_challenge(
        &self,
        admin_email: &str,
        challenge_id: ChallengeId,
        patch: ChallengePatch,
    ) -> Result<ChallengeRecord> {
        self.require_admin(admin_email, "update challenge").await?;

        let update = ChallengeUpdate {
            title: patch.title.map(ChallengeTitle::new).transpose()?,
            description: patch.description,
            flag: patch.flag.map(Flag::new).transpose()?,
            flag_format: patch
                .flag_format
                .map(|format| FlagFormat::new(format).map(FlagFormat::into_inner))
                .transpose()?,
            difficulty: patch
                .difficulty
                .map(|d| d.parse::<Difficulty>())
                .transpose()?,
            category: patch.category.map(|c| c.parse::<Category>()).transpose()?,
            points: patch.points.map(Points::new).transpose()?,
            is_active: patch.is_active,
            updated_at: self.clock.now(),
        };

        // Keeps a deactivation from landing in the middle of a submission.
        let _guard = self.locks.acquire(challenge_id).await;

        let record = self
            .challenges
            .update(challenge_id, update)
            .await?
            .ok_or_else(|| CtfError::challenge_not_found(challenge_id))?;

        info!(challenge_id = %record.id, is_active = record.is_active, "challenge updated");
        Ok(record)
    }

    /// Deletes a challenge together with its ledger entries. Returns how many
    /// submissions were removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_challenge(&self, admin_email: &str, challenge_id: ChallengeId) -> Result<u64> {
        self.require_admin(admin_email, "delete challenge").await?;

        let guard = self.locks.acquire(challenge_id).await;

        let deleted_submissions = self
            .challenges
            .delete(challenge_id)
            .await?
            .ok_or_else(|| CtfError::challenge_not_found(challenge_id))?;

        drop(guard);
        self.locks.forget(challenge_id).await;

        info!(deleted_submissions, "challenge deleted");
        Ok(deleted_submissions)
    }

    /// Active challenges for players; everything for admins.
    #[tracing::instrument(skip(self))]
    pub async fn list_challenges(&self, viewer_email: Option<&str>) -> Result<Vec<ChallengeView>> {
        let viewer = self.resolve_viewer(viewer_email).await?;

        let records = self.challenges.list(!viewer.is_admin).await?;
        let correct = self.submissions.list_correct().await?;

        let mut solve_counts: HashMap<ChallengeId, u32> = HashMap::new();
        let mut solved_by_viewer: HashSet<ChallengeId> = HashSet::new();
        for entry in &correct {
            *solve_counts.entry(entry.challenge_id).or_default() += 1;
            if viewer.email.as_ref() == Some(&entry.user_email) {
                solved_by_viewer.insert(entry.challenge_id);
            }
        }

        Ok(records
            .into_iter()
            .map(|challenge| ChallengeView {
                solve_count: solve_counts.get(&challenge.id).copied().unwrap_or(0),
                solved_by_viewer: solved_by_viewer.contains(&challenge.id),
                reveal_flag: viewer.is_admin,
                challenge,
            })
            .collect())
    }

    /// Inactive challenges are only visible to admins.
    #[tracing::instrument(skip(self))]
    pub async fn get_challenge(
        &self,
        challenge_id: ChallengeId,
        viewer_email: Option<&str>,
    ) -> Result<ChallengeView> {
        let viewer = self.resolve_viewer(viewer_email).await?;

        let challenge = self
            .challenges
            .find_by_id(challenge_id)
            .await?
            .filter(|challenge| challenge.is_active || viewer.is_admin)
            .ok_or_else(|| CtfError::challenge_not_found(challenge_id))?;

        let correct: Vec<SubmissionRecord> = self
            .submissions
            .list_correct_by_challenge(challenge_id)
            .await?;

        Ok(ChallengeView {
            solve_count: u32::try_from(correct.len()).unwrap_or(u32::MAX),
            solved_by_viewer: viewer
                .email
                .as_ref()
                .is_some_and(|email| correct.iter().any(|entry| &entry.user_email == email)),
            reveal_flag: viewer.is_admin,
            challenge,
        })
    }

    async fn require_admin(&self, admin_email: &str, action: &str) -> Result<UserEmail> {
        let email = UserEmail::parse(admin_email)?;

        match self.profiles.find_by_email(&email).await? {
            Some(profile) if profile.is_admin => Ok(email),
            _ => {
                info!(user_email = %email, action, "admin check failed");
                Err(CtfError::Unauthorized(action.to_string()))
            }
        }
    }

    async fn resolve_viewer(&self, viewer_email: Option<&str>) -> Result<Viewer> {
        let Some(raw) = viewer_email else {
            return Ok(Viewer {
                email: None,
                is_admin: false,
            });
        };

        let email = UserEmail::parse(raw)?;
        let is_admin = self
            .profiles
            .find_by_email(&email)
            .await?
            .is_some_and(|profile| profile.is_admin);

        Ok(Viewer {
            email: Some(email),
            is_admin,
        })
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use flagforge_core::domain::{ChallengeId, SubmissionId, UserEmail};
use flagforge_server::repository::{
    ChallengeRecord, ChallengeRepository, ChallengeUpdate, NewChallenge, NewSubmission,
    NewUserProfile, SubmissionRecord, SubmissionRepository, UserProfileRecord,
    UserProfileRepository,
};
use flagforge_server::service::{ChallengeDraft, Clock, CtfService};
use tokio::sync::RwLock;

pub const ADMIN: &str = "root@example.com";

/// In-memory stand-in for the three repositories.
///
/// Every call yields to the scheduler first so that unsynchronized callers
/// would interleave.
#[derive(Default)]
pub struct MemoryStore {
    challenges: RwLock<Vec<ChallengeRecord>>,
    submissions: RwLock<Vec<SubmissionRecord>>,
    profiles: RwLock<HashMap<UserEmail, UserProfileRecord>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn ledger(&self) -> Vec<SubmissionRecord> {
        self.submissions.read().await.clone()
    }
}

fn apply_update(update: ChallengeUpdate, record: &mut ChallengeRecord) {
    if let Some(title) = update.title {
        record.title = title.into_inner();
    }
    if let Some(description) = update.description {
        record.description = description;
    }
    if let Some(flag) = update.flag {
        record.flag = flag;
    }
    if let Some(flag_format) = update.flag_format {
        record.flag_format = flag_format;
    }
    if let Some(difficulty) = update.difficulty {
        record.difficulty = difficulty;
    }
    if let Some(category) = update.category {
        record.category = category;
    }
    if let Some(points) = update.points {
        record.points = points;
    }
    if let Some(is_active) = update.is_active {
        record.is_active = is_active;
    }
    record.updated_at = update.updated_at;
}

#[async_trait]
impl ChallengeRepository for MemoryStore {
    async fn create(&self, new_challenge: NewChallenge) -> Result<ChallengeRecord> {
        tokio::task::yield_now().await;
        let record = ChallengeRecord {
            id: ChallengeId::new(),
            title: new_challenge.title.into_inner(),
            description: new_challenge.description,
            flag: new_challenge.flag,
            flag_format: new_challenge.flag_format,
            difficulty: new_challenge.difficulty,
            category: new_challenge.category,
            points: new_challenge.points,
            is_active: new_challenge.is_active,
            created_by: new_challenge.created_by,
            created_at: new_challenge.created_at,
            updated_at: new_challenge.created_at,
        };
        self.challenges.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, challenge_id: ChallengeId) -> Result<Option<ChallengeRecord>> {
        tokio::task::yield_now().await;
        let challenges = self.challenges.read().await;
        Ok(challenges.iter().find(|c| c.id == challenge_id).cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<ChallengeRecord>> {
        tokio::task::yield_now().await;
        let challenges = self.challenges.read().await;
        Ok(challenges
            .iter()
            .filter(|c| c.is_active || !active_only)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        challenge_id: ChallengeId,
        update: ChallengeUpdate,
    ) -> Result<Option<ChallengeRecord>> {
        tokio::task::yield_now().await;
        let mut challenges = self.challenges.write().await;
        let Some(record) = challenges.iter_mut().find(|c| c.id == challenge_id) else {
            return Ok(None);
        };
        apply_update(update, record);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, challenge_id: ChallengeId) -> Result<Option<u64>> {
        tokio::task::yield_now().await;
        let mut challenges = self.challenges.write().await;
        let mut submissions = self.submissions.write().await;

        let before = challenges.len();
        challenges.retain(|c| c.id != challenge_id);
        if challenges.len() == before {
            return Ok(None);
        }

        let ledger_before = submissions.len();
        submissions.retain(|s| s.challenge_id != challenge_id);
        Ok(Some((ledger_before - submissions.len()) as u64))
    }

    async fn count_active(&self) -> Result<u64> {
        tokio::task::yield_now().await;
        let challenges = self.challenges.read().await;
        Ok(challenges.iter().filter(|c| c.is_active).count() as u64)
    }
}

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn append(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        tokio::task::yield_now().await;
        let record = SubmissionRecord {
            id: SubmissionId::new(),
            challenge_id: new_submission.challenge_id,
            user_email: new_submission.user_email,
            is_correct: new_submission.is_correct,
            submitted_flag: new_submission.submitted_flag,
            submitted_at: new_submission.submitted_at,
            points_earned: new_submission.points_earned,
            is_first_blood: new_submission.is_first_blood,
        };
        self.submissions.write().await.push(record.clone());
        Ok(record)
    }

    async fn has_correct(&self, challenge_id: ChallengeId, user_email: &UserEmail) -> Result<bool> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions.iter().any(|s| {
            s.challenge_id == challenge_id && &s.user_email == user_email && s.is_correct
        }))
    }

    async fn any_correct(&self, challenge_id: ChallengeId) -> Result<bool> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .any(|s| s.challenge_id == challenge_id && s.is_correct))
    }

    async fn count_attempts_since(
        &self,
        challenge_id: ChallengeId,
        user_email: &UserEmail,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .filter(|s| {
                s.challenge_id == challenge_id
                    && &s.user_email == user_email
                    && s.submitted_at >= since
            })
            .count() as u64)
    }

    async fn list_correct(&self) -> Result<Vec<SubmissionRecord>> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions.iter().filter(|s| s.is_correct).cloned().collect())
    }

    async fn list_correct_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<SubmissionRecord>> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .filter(|s| s.challenge_id == challenge_id && s.is_correct)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_email: &UserEmail) -> Result<Vec<SubmissionRecord>> {
        tokio::task::yield_now().await;
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .rev()
            .filter(|s| &s.user_email == user_email)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserProfileRepository for MemoryStore {
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<UserProfileRecord>> {
        Ok(self.profiles.read().await.get(email).cloned())
    }

    async fn find_many(&self, emails: &[UserEmail]) -> Result<Vec<UserProfileRecord>> {
        let profiles = self.profiles.read().await;
        Ok(emails
            .iter()
            .filter_map(|email| profiles.get(email).cloned())
            .collect())
    }

    async fn upsert(&self, profile: NewUserProfile) -> Result<UserProfileRecord> {
        let record = UserProfileRecord {
            email: profile.email,
            display_name: profile.display_name,
            is_admin: profile.is_admin,
        };
        self.profiles
            .write()
            .await
            .insert(record.email.clone(), record.clone());
        Ok(record)
    }
}

/// Hands out timestamps one second apart, starting at a fixed instant.
pub struct StepClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid base timestamp"),
            ticks: AtomicI64::new(0),
        })
    }

    /// Jumps the clock forward without issuing a timestamp.
    pub fn advance(&self, secs: i64) {
        self.ticks.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.base + TimeDelta::seconds(tick)
    }
}

pub async fn seed_profile(store: &MemoryStore, email: &str, display_name: &str, is_admin: bool) {
    store
        .upsert(NewUserProfile {
            email: UserEmail::parse(email).expect("valid email"),
            display_name: display_name.to_string(),
            is_admin,
        })
        .await
        .expect("profile upsert should succeed");
}

/// A service over a fresh store with an admin profile already seeded.
pub async fn service_with_store() -> (CtfService, Arc<MemoryStore>, Arc<StepClock>) {
    let store = MemoryStore::new();
    let clock = StepClock::new();
    seed_profile(&store, ADMIN, "root", true).await;

    let service = CtfService::new(store.clone(), store.clone(), store.clone())
        .with_clock(clock.clone());

    (service, store, clock)
}

pub fn draft(title: &str, flag: &str, points: i64) -> ChallengeDraft {
    ChallengeDraft {
        title: title.to_string(),
        description: format!("{title} description"),
        flag: flag.to_string(),
        flag_format: "CTF{...}".to_string(),
        difficulty: "Easy".to_string(),
        category: "Web".to_string(),
        points,
        is_active: true,
    }
}

pub async fn create_challenge(service: &CtfService, title: &str, flag: &str, points: i64) -> ChallengeId {
    service
        .create_challenge(ADMIN, draft(title, flag, points))
        .await
        .expect("admin should be able to create a challenge")
        .id
}

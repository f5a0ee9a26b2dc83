use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flagforge_core::domain::{
    ChallengeId, Solve, SolverEntry, UserEmail, UserStats, order_solvers, rank_standings,
    user_stats,
};

use super::{CtfService, Result};
use crate::repository::SubmissionRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardEntry {
    pub rank: u32,
    pub email: UserEmail,
    pub nickname: String,
    pub total_points: u64,
    pub solved_challenges: u32,
    pub first_bloods: u32,
    pub last_solve_time: DateTime<Utc>,
}

fn solves(records: &[SubmissionRecord]) -> Vec<Solve> {
    records.iter().filter_map(SubmissionRecord::as_solve).collect()
}

impl CtfService {
    #[tracing::instrument(skip(self))]
    pub async fn get_challenge_solvers(&self, challenge_id: ChallengeId) -> Result<Vec<SolverEntry>> {
        let records = self
            .submissions
            .list_correct_by_challenge(challenge_id)
            .await?;

        Ok(order_solvers(challenge_id, &solves(&records)))
    }

    /// Full ranking, truncated to `limit` rows afterwards so ranks stay global.
    #[tracing::instrument(skip(self))]
    pub async fn get_scoreboard(&self, limit: Option<usize>) -> Result<Vec<ScoreboardEntry>> {
        let records = self.submissions.list_correct().await?;
        let mut standings = rank_standings(&solves(&records));
        if let Some(limit) = limit {
            standings.truncate(limit);
        }

        let emails: Vec<UserEmail> = standings.iter().map(|s| s.email.clone()).collect();
        let nicknames: HashMap<UserEmail, String> = self
            .profiles
            .find_many(&emails)
            .await?
            .into_iter()
            .filter(|profile| !profile.display_name.trim().is_empty())
            .map(|profile| (profile.email, profile.display_name))
            .collect();

        Ok(standings
            .into_iter()
            .map(|standing| {
                let nickname = nicknames
                    .get(&standing.email)
                    .cloned()
                    .unwrap_or_else(|| standing.email.local_part().to_string());

                ScoreboardEntry {
                    rank: standing.rank,
                    email: standing.email,
                    nickname,
                    total_points: standing.total_points,
                    solved_challenges: standing.solved_challenges,
                    first_bloods: standing.first_bloods,
                    last_solve_time: standing.last_solve_time,
                }
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user_stats(&self, user_email: &str) -> Result<UserStats> {
        let user_email = UserEmail::parse(user_email)?;

        let records = self.submissions.list_correct().await?;
        let standings = rank_standings(&solves(&records));
        let total_challenges = self.challenges.count_active().await?;

        Ok(user_stats(&standings, &user_email, total_challenges))
    }

    /// Every attempt of one user, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_user_submissions(&self, user_email: &str) -> Result<Vec<SubmissionRecord>> {
        let user_email = UserEmail::parse(user_email)?;
        Ok(self.submissions.list_by_user(&user_email).await?)
    }
}

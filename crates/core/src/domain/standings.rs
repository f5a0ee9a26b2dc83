//! Read-side aggregations over the ledger.
//!
//! Every function here takes the correct entries of the ledger, in ledger
//! order, and recomputes its view from scratch. Nothing is cached.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{ChallengeId, UserEmail};

/// A correct ledger entry, reduced to what the aggregations need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solve {
    pub challenge_id: ChallengeId,
    pub user_email: UserEmail,
    pub solved_at: DateTime<Utc>,
    pub points: u32,
    pub first_blood: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverEntry {
    pub user_email: UserEmail,
    pub solved_at: DateTime<Utc>,
    pub solve_order: u32,
    pub first_blood: bool,
}

/// Solvers of one challenge, earliest first.
///
/// `solve_order` is 1-based. `first_blood` is the flag recorded in the ledger,
/// and the recorded first blood always takes order 1, so the list agrees with
/// the scoreboard even when timestamps tie or the clock stepped backwards.
/// Remaining ties keep their input order.
pub fn order_solvers(challenge_id: ChallengeId, solves: &[Solve]) -> Vec<SolverEntry> {
    let mut matching: Vec<&Solve> = solves
        .iter()
        .filter(|solve| solve.challenge_id == challenge_id)
        .collect();
    matching.sort_by_key(|solve| (!solve.first_blood, solve.solved_at));

    matching
        .into_iter()
        .zip(1_u32..)
        .map(|(solve, order)| SolverEntry {
            user_email: solve.user_email.clone(),
            solved_at: solve.solved_at,
            solve_order: order,
            first_blood: solve.first_blood,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub rank: u32,
    pub email: UserEmail,
    pub total_points: u64,
    pub solved_challenges: u32,
    pub first_bloods: u32,
    pub last_solve_time: DateTime<Utc>,
}

/// Ranks every user with at least one solve.
///
/// Ordering is total points descending, then earliest last solve, then email
/// so that full ties still come out the same on every call.
pub fn rank_standings(solves: &[Solve]) -> Vec<Standing> {
    let mut grouped: BTreeMap<&UserEmail, Standing> = BTreeMap::new();

    for solve in solves {
        let standing = grouped
            .entry(&solve.user_email)
            .or_insert_with(|| Standing {
                rank: 0,
                email: solve.user_email.clone(),
                total_points: 0,
                solved_challenges: 0,
                first_bloods: 0,
                last_solve_time: solve.solved_at,
            });

        standing.total_points += u64::from(solve.points);
        standing.solved_challenges += 1;
        if solve.first_blood {
            standing.first_bloods += 1;
        }
        standing.last_solve_time = standing.last_solve_time.max(solve.solved_at);
    }

    let mut standings: Vec<Standing> = grouped.into_values().collect();
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(a.last_solve_time.cmp(&b.last_solve_time))
    });

    for (standing, rank) in standings.iter_mut().zip(1_u32..) {
        standing.rank = rank;
    }

    standings
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub completed_challenges: u32,
    pub total_challenges: u64,
    pub total_points: u64,
    pub rank: u32,
    pub percentile: u32,
    pub first_bloods: u32,
}

/// Stats of one user against the full ranking produced by [`rank_standings`].
///
/// A user without solves ranks right after the last solver.
pub fn user_stats(standings: &[Standing], email: &UserEmail, total_challenges: u64) -> UserStats {
    let ranked = standings.len();
    let own = standings.iter().find(|standing| &standing.email == email);

    let rank = match own {
        Some(standing) => standing.rank,
        None => u32::try_from(ranked + 1).unwrap_or(u32::MAX),
    };

    let percentile = if ranked == 0 {
        0
    } else {
        let raw = (1.0 - f64::from(rank) / ranked as f64) * 100.0;
        raw.round().clamp(0.0, 100.0) as u32
    };

    UserStats {
        completed_challenges: own.map_or(0, |s| s.solved_challenges),
        total_challenges,
        total_points: own.map_or(0, |s| s.total_points),
        rank,
        percentile,
        first_bloods: own.map_or(0, |s| s.first_bloods),
    }
}

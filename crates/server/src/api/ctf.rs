//! Player-facing routes: challenges, flag submission and standings.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use flagforge_api_types::{
    ChallengeResponse, ScoreboardEntryResponse, SolverEntryResponse, SubmissionResponse,
    SubmitFlagRequest, SubmitFlagResponse, UserStatsResponse,
};
use flagforge_core::domain::{ChallengeId, SolverEntry, UserStats};
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::repository::SubmissionRecord;
use crate::service::{ChallengeView, ScoreboardEntry, SubmitResult};

pub fn create_ctf_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenges", get(list_challenges))
        .route("/api/challenges/{id}", get(get_challenge))
        .route("/api/challenges/{id}/submissions", post(submit_flag))
        .route("/api/challenges/{id}/solvers", get(get_challenge_solvers))
        .route("/api/scoreboard", get(get_scoreboard))
        .route("/api/users/{email}/stats", get(get_user_stats))
        .route("/api/users/{email}/submissions", get(list_user_submissions))
}

/// A malformed id cannot name an existing challenge.
pub(super) fn parse_challenge_id(raw: &str) -> Result<ChallengeId, ApiError> {
    ChallengeId::from_str(raw).map_err(|_| ApiError::not_found(format!("challenge not found: {raw}")))
}

#[derive(Debug, Deserialize)]
struct ViewerQuery {
    viewer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreboardQuery {
    limit: Option<usize>,
}

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<ChallengeResponse>>, ApiError> {
    let views = state
        .service
        .list_challenges(query.viewer.as_deref())
        .await?;

    Ok(Json(views.iter().map(challenge_response).collect()))
}

async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge_id = parse_challenge_id(&id)?;
    let view = state
        .service
        .get_challenge(challenge_id, query.viewer.as_deref())
        .await?;

    Ok(Json(challenge_response(&view)))
}

/// An incorrect flag still answers 200 with `success: false`.
async fn submit_flag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SubmitFlagRequest>,
) -> Result<Json<SubmitFlagResponse>, ApiError> {
    let challenge_id = parse_challenge_id(&id)?;
    let result = state
        .service
        .submit_flag(challenge_id, &request.email, &request.flag)
        .await?;

    Ok(Json(submit_response(result)))
}

async fn get_challenge_solvers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SolverEntryResponse>>, ApiError> {
    // Deleted or unknown challenges simply have no solvers.
    let Ok(challenge_id) = ChallengeId::from_str(&id) else {
        return Ok(Json(Vec::new()));
    };

    let solvers = state.service.get_challenge_solvers(challenge_id).await?;
    Ok(Json(solvers.into_iter().map(solver_response).collect()))
}

async fn get_scoreboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScoreboardQuery>,
) -> Result<Json<Vec<ScoreboardEntryResponse>>, ApiError> {
    let limit = query.limit.or(state.scoreboard_limit);
    let entries = state.service.get_scoreboard(limit).await?;

    Ok(Json(entries.into_iter().map(scoreboard_response).collect()))
}

async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let stats = state.service.get_user_stats(&email).await?;
    Ok(Json(stats_response(stats)))
}

async fn list_user_submissions(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let records = state.service.list_user_submissions(&email).await?;
    Ok(Json(records.into_iter().map(submission_response).collect()))
}

pub(super) fn challenge_response(view: &ChallengeView) -> ChallengeResponse {
    let challenge = &view.challenge;
    ChallengeResponse {
        id: challenge.id.to_string(),
        title: challenge.title.clone(),
        description: challenge.description.clone(),
        flag: view.displayed_flag().to_string(),
        flag_format: challenge.flag_format.clone(),
        difficulty: challenge.difficulty.to_string(),
        category: challenge.category.to_string(),
        points: challenge.points.value(),
        is_active: challenge.is_active,
        created_by: challenge.created_by.to_string(),
        created_at: challenge.created_at,
        updated_at: challenge.updated_at,
        solve_count: view.solve_count,
        solved_by_viewer: view.solved_by_viewer,
    }
}

fn submit_response(result: SubmitResult) -> SubmitFlagResponse {
    SubmitFlagResponse {
        success: result.success,
        points_awarded: result.points_awarded,
        first_blood: result.first_blood,
        bonus_points: result.bonus_points,
    }
}

fn solver_response(entry: SolverEntry) -> SolverEntryResponse {
    SolverEntryResponse {
        user_email: entry.user_email.to_string(),
        solved_at: entry.solved_at,
        solve_order: entry.solve_order,
        first_blood: entry.first_blood,
    }
}

fn scoreboard_response(entry: ScoreboardEntry) -> ScoreboardEntryResponse {
    ScoreboardEntryResponse {
        rank: entry.rank,
        email: entry.email.to_string(),
        nickname: entry.nickname,
        total_points: entry.total_points,
        solved_challenges: entry.solved_challenges,
        first_bloods: entry.first_bloods,
        last_solve_time: entry.last_solve_time,
    }
}

fn stats_response(stats: UserStats) -> UserStatsResponse {
    UserStatsResponse {
        completed_challenges: stats.completed_challenges,
        total_challenges: stats.total_challenges,
        total_points: stats.total_points,
        rank: stats.rank,
        percentile: stats.percentile,
        first_bloods: stats.first_bloods,
    }
}

fn submission_response(record: SubmissionRecord) -> SubmissionResponse {
    SubmissionResponse {
        id: record.id.to_string(),
        challenge_id: record.challenge_id.to_string(),
        submitted_flag: record.submitted_flag,
        is_correct: record.is_correct,
        points_earned: record.points_earned,
        is_first_blood: record.is_first_blood,
        submitted_at: record.submitted_at,
    }
}

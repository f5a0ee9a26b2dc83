//! Admin-gated challenge management.
//!
//! The caller names its identity in `adminEmail`; the service checks the
//! profile's admin flag.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{patch, post},
};
use flagforge_api_types::{
    ChallengeResponse, CreateChallengeRequest, DeleteChallengeResponse, UpdateChallengeRequest,
};
use serde::Deserialize;

use super::ctf::{challenge_response, parse_challenge_id};
use super::error::ApiError;
use super::state::AppState;
use crate::service::{ChallengeDraft, ChallengePatch};

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/challenges", post(create_challenge))
        .route(
            "/api/admin/challenges/{id}",
            patch(update_challenge).delete(delete_challenge),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminQuery {
    admin_email: String,
}

async fn create_challenge(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateChallengeRequest>,
) -> Result<(StatusCode, Json<ChallengeResponse>), ApiError> {
    let draft = ChallengeDraft {
        title: request.title,
        description: request.description,
        flag: request.flag,
        flag_format: request.flag_format,
        difficulty: request.difficulty,
        category: request.category,
        points: request.points,
        is_active: request.is_active,
    };

    let record = state
        .service
        .create_challenge(&request.admin_email, draft)
        .await?;
    let view = state
        .service
        .get_challenge(record.id, Some(&request.admin_email))
        .await?;

    Ok((StatusCode::CREATED, Json(challenge_response(&view))))
}

async fn update_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge_id = parse_challenge_id(&id)?;
    let patch = ChallengePatch {
        title: request.title,
        description: request.description,
        flag: request.flag,
        flag_format: request.flag_format,
        difficulty: request.difficulty,
        category: request.category,
        points: request.points,
        is_active: request.is_active,
    };

    state
        .service
        .update_challenge(&request.admin_email, challenge_id, patch)
        .await?;
    let view = state
        .service
        .get_challenge(challenge_id, Some(&request.admin_email))
        .await?;

    Ok(Json(challenge_response(&view)))
}

async fn delete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<DeleteChallengeResponse>, ApiError> {
    let challenge_id = parse_challenge_id(&id)?;
    let deleted_submissions = state
        .service
        .delete_challenge(&query.admin_email, challenge_id)
        .await?;

    Ok(Json(DeleteChallengeResponse {
        deleted_submissions,
    }))
}

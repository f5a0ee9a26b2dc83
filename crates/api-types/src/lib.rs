//! Shared request/response types used by API-facing crates.
//!
//! Field names are camelCase on the wire to match the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitFlagRequest {
    pub email: String,
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFlagResponse {
    pub success: bool,
    pub points_awarded: u32,
    pub first_blood: bool,
    pub bonus_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverEntryResponse {
    pub user_email: String,
    pub solved_at: DateTime<Utc>,
    pub solve_order: u32,
    pub first_blood: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardEntryResponse {
    pub rank: u32,
    pub email: String,
    pub nickname: String,
    pub total_points: u64,
    pub solved_challenges: u32,
    pub first_bloods: u32,
    pub last_solve_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub completed_challenges: u32,
    pub total_challenges: u64,
    pub total_points: u64,
    pub rank: u32,
    pub percentile: u32,
    pub first_bloods: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Masked unless the viewer is an admin.
    pub flag: String,
    pub flag_format: String,
    pub difficulty: String,
    pub category: String,
    pub points: u32,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub solve_count: u32,
    pub solved_by_viewer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub challenge_id: String,
    pub submitted_flag: String,
    pub is_correct: bool,
    pub points_earned: u32,
    pub is_first_blood: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Points arrive as a signed integer so that `0` or `-10` is reported as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRequest {
    pub admin_email: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub flag: String,
    #[serde(default)]
    pub flag_format: String,
    pub difficulty: String,
    pub category: String,
    pub points: i64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChallengeRequest {
    pub admin_email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub flag_format: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChallengeResponse {
    pub deleted_submissions: u64,
}

/// Pushed to `/ws/solves` subscribers after every correct submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveEventMessage {
    pub challenge_id: String,
    pub challenge_title: String,
    pub user_email: String,
    pub points_awarded: u32,
    pub first_blood: bool,
    pub solved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn submit_response_uses_camel_case() {
        let response = SubmitFlagResponse {
            success: true,
            points_awarded: 150,
            first_blood: true,
            bonus_points: 50,
        };

        let json = serde_json::to_value(&response).expect("serialize submit response");
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "pointsAwarded": 150,
                "firstBlood": true,
                "bonusPoints": 50,
            })
        );
    }

    #[test]
    fn create_request_defaults_optional_fields() {
        let request: CreateChallengeRequest = serde_json::from_str(
            r#"{
                "adminEmail": "root@example.com",
                "title": "Baby RSA",
                "flag": "CTF{e=3}",
                "difficulty": "Easy",
                "category": "Crypto",
                "points": 100
            }"#,
        )
        .expect("deserialize create request");

        assert!(request.is_active);
        assert!(request.description.is_empty());
        assert!(request.flag_format.is_empty());
        assert_eq!(request.points, 100);
    }

    #[test]
    fn update_request_accepts_a_partial_patch() {
        let request: UpdateChallengeRequest =
            serde_json::from_str(r#"{"adminEmail": "root@example.com", "isActive": false}"#)
                .expect("deserialize update request");

        assert_eq!(request.is_active, Some(false));
        assert_eq!(request.title, None);
        assert_eq!(request.points, None);
    }
}

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{ADMIN, StepClock, draft};
use flagforge_core::domain::{ChallengeId, Points, UserEmail};
use flagforge_server::config::AdminSeed;
use flagforge_server::db;
use flagforge_server::repository::{
    ChallengeRepository, NewSubmission, SeaOrmChallengeRepository, SeaOrmSubmissionRepository,
    SeaOrmUserProfileRepository, SubmissionRepository, UserProfileRepository,
};
use flagforge_server::service::{ChallengePatch, CtfError, CtfService};
use sea_orm::{ConnectionTrait, DatabaseConnection};

async fn sqlite_service() -> CtfService {
    sqlite_service_and_db().await.0
}

async fn sqlite_service_and_db() -> (CtfService, DatabaseConnection) {
    let db = db::init_pool_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory sqlite should migrate");

    let profiles = Arc::new(SeaOrmUserProfileRepository::new(db.clone()));
    db::seed_admins(
        profiles.as_ref(),
        &[AdminSeed {
            email: ADMIN.to_string(),
            display_name: None,
        }],
    )
    .await
    .expect("admin seed should succeed");

    let seeded = profiles
        .find_by_email(&UserEmail::parse(ADMIN).expect("valid email"))
        .await
        .expect("profile lookup should succeed")
        .expect("admin profile should exist");
    assert!(seeded.is_admin);
    assert_eq!(seeded.display_name, "root");

    let service = CtfService::new(
        Arc::new(SeaOrmChallengeRepository::new(db.clone())),
        Arc::new(SeaOrmSubmissionRepository::new(db.clone())),
        profiles,
    )
    .with_clock(StepClock::new());

    (service, db)
}

#[tokio::test]
async fn scoring_round_trips_through_the_database() {
    let service = sqlite_service().await;
    let challenge = service
        .create_challenge(ADMIN, draft("Warmup", "CTF{hello}", 100))
        .await
        .expect("admin should create")
        .id;

    let a = service
        .submit_flag(challenge, "A@x.com", "CTF{hello}")
        .await
        .expect("first solve");
    assert!(a.first_blood);
    assert_eq!(a.points_awarded, 150);

    let wrong = service
        .submit_flag(challenge, "b@x.com", "CTF{nope}")
        .await
        .expect("wrong flag is recorded");
    assert!(!wrong.success);

    let b = service
        .submit_flag(challenge, "b@x.com", "CTF{hello}")
        .await
        .expect("second solve");
    assert!(!b.first_blood);
    assert_eq!(b.points_awarded, 100);

    let err = service
        .submit_flag(challenge, "a@x.com", "CTF{hello}")
        .await
        .expect_err("repeat solve should be rejected");
    assert!(matches!(err, CtfError::AlreadySolved { .. }));

    let solvers = service
        .get_challenge_solvers(challenge)
        .await
        .expect("solvers should load");
    let emails: Vec<&str> = solvers.iter().map(|s| s.user_email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    assert!(solvers[0].first_blood);
    assert!(!solvers[1].first_blood);

    let board = service.get_scoreboard(None).await.expect("scoreboard should load");
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].email.as_str(), "a@x.com");
    assert_eq!(board[0].total_points, 150);
    assert_eq!(board[1].total_points, 100);

    let history = service
        .list_user_submissions("b@x.com")
        .await
        .expect("history should load");
    assert_eq!(history.len(), 2);
    assert!(history[0].is_correct);
    assert!(!history[1].is_correct);
}

#[tokio::test]
async fn update_and_delete_through_the_database() {
    let service = sqlite_service().await;
    let challenge = service
        .create_challenge(ADMIN, draft("Doomed", "CTF{d}", 100))
        .await
        .expect("admin should create")
        .id;

    let updated = service
        .update_challenge(
            ADMIN,
            challenge,
            ChallengePatch {
                category: Some("Forensics".to_string()),
                points: Some(40),
                ..Default::default()
            },
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.points.value(), 40);
    assert_eq!(updated.category.as_str(), "Forensics");

    service.submit_flag(challenge, "a@x.com", "CTF{d}").await.expect("recorded");
    service.submit_flag(challenge, "b@x.com", "CTF{x}").await.expect("recorded");

    let stats = service.get_user_stats("a@x.com").await.expect("stats should load");
    assert_eq!(stats.total_points, 60);
    assert_eq!(stats.total_challenges, 1);

    let deleted = service
        .delete_challenge(ADMIN, challenge)
        .await
        .expect("delete should succeed");
    assert_eq!(deleted, 2);

    assert!(service
        .get_challenge_solvers(challenge)
        .await
        .expect("solvers should load")
        .is_empty());
    assert!(service
        .get_scoreboard(None)
        .await
        .expect("scoreboard should load")
        .is_empty());
    assert!(matches!(
        service.get_challenge(challenge, Some(ADMIN)).await,
        Err(CtfError::NotFound(_))
    ));
}

#[tokio::test]
async fn largest_first_blood_award_fits_the_ledger_column() {
    let service = sqlite_service().await;
    let challenge = service
        .create_challenge(ADMIN, draft("Whale", "CTF{whale}", i64::from(Points::MAX)))
        .await
        .expect("maximum points should be accepted")
        .id;

    let result = service
        .submit_flag(challenge, "a@x.com", "CTF{whale}")
        .await
        .expect("first blood should be recorded");
    assert_eq!(result.points_awarded, 1_500_000_000);

    let board = service.get_scoreboard(None).await.expect("scoreboard should load");
    assert_eq!(board[0].total_points, 1_500_000_000);
}

#[tokio::test]
async fn recorded_first_blood_leads_solvers_on_a_timestamp_tie() {
    let (service, db) = sqlite_service_and_db().await;
    let challenge = service
        .create_challenge(ADMIN, draft("Tie", "CTF{tie}", 100))
        .await
        .expect("admin should create")
        .id;

    let ledger = SeaOrmSubmissionRepository::new(db);
    let instant = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    for (user, points, first_blood) in [("b@x.com", 100, false), ("a@x.com", 150, true)] {
        ledger
            .append(NewSubmission {
                challenge_id: challenge,
                user_email: UserEmail::parse(user).expect("valid email"),
                is_correct: true,
                submitted_flag: "CTF{tie}".to_string(),
                submitted_at: instant,
                points_earned: points,
                is_first_blood: first_blood,
            })
            .await
            .expect("append should succeed");
    }

    let rows = ledger
        .list_correct_by_challenge(challenge)
        .await
        .expect("ledger should load");
    assert!(rows[0].is_first_blood);

    let solvers = service
        .get_challenge_solvers(challenge)
        .await
        .expect("solvers should load");
    assert_eq!(solvers[0].user_email.as_str(), "a@x.com");
    assert!(solvers[0].first_blood);
    assert!(!solvers[1].first_blood);

    let board = service.get_scoreboard(None).await.expect("scoreboard should load");
    let first_bloods: Vec<(&str, u32)> = board
        .iter()
        .map(|e| (e.email.as_str(), e.first_bloods))
        .collect();
    assert_eq!(first_bloods, vec![("a@x.com", 1), ("b@x.com", 0)]);
}

#[tokio::test]
async fn failed_delete_rolls_back_the_ledger_cleanup() {
    let (_service, db) = sqlite_service_and_db().await;
    db.execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .expect("pragma should apply");

    // Ledger rows whose challenge row is missing.
    let orphan = ChallengeId::new();
    let ledger = SeaOrmSubmissionRepository::new(db.clone());
    let user = UserEmail::parse("a@x.com").expect("valid email");
    ledger
        .append(NewSubmission {
            challenge_id: orphan,
            user_email: user.clone(),
            is_correct: false,
            submitted_flag: "CTF{x}".to_string(),
            submitted_at: Utc::now(),
            points_earned: 0,
            is_first_blood: false,
        })
        .await
        .expect("append should succeed");

    let challenges = SeaOrmChallengeRepository::new(db);
    let deleted = challenges
        .delete(orphan)
        .await
        .expect("delete should not error");
    assert_eq!(deleted, None);

    let remaining = ledger.list_by_user(&user).await.expect("ledger should load");
    assert_eq!(remaining.len(), 1);
}

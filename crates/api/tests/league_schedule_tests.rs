//! Schedule generation against Postgres. Run with
//! `TEST_DATABASE_URL=... cargo test -- --ignored`.

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api::config::SchedulingConfig;
use api::error::AppError;
use api::gql::build_schema;
use api::gql::domains::schedule::ScheduleOptions;
use api::services::{AvailabilityChecker, PgAvailabilityChecker};
use api::AppState;
use async_graphql::Variables;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::*;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

/// Delegates to Postgres but reports the court as taken on the n-th check.
struct FailingChecker {
    fail_on: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl AvailabilityChecker for FailingChecker {
    async fn free_courts(
        &self,
        conn: &mut PgConnection,
        court_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Ok(Vec::new());
        }
        PgAvailabilityChecker
            .free_courts(conn, court_ids, start, end, exclude_booking_id)
            .await
    }
}

/// Holds every availability check long enough to outlive the generation
/// timeout.
struct SlowChecker {
    delay: Duration,
}

#[async_trait]
impl AvailabilityChecker for SlowChecker {
    async fn free_courts(
        &self,
        conn: &mut PgConnection,
        court_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        tokio::time::sleep(self.delay).await;
        PgAvailabilityChecker
            .free_courts(conn, court_ids, start, end, exclude_booking_id)
            .await
    }
}

/// (home, away, court, start) for every stored match, sorted.
async fn snapshot(pool: &PgPool, league_id: Uuid) -> Vec<(Uuid, Uuid, Uuid, DateTime<Utc>)> {
    let rows = infra::repos::matches::list_schedule(pool, league_id)
        .await
        .expect("list schedule");
    let mut out: Vec<_> = rows
        .into_iter()
        .map(|r| {
            (
                r.home_team_id,
                r.away_team_id,
                r.court_id.expect("booked court"),
                r.scheduled_at,
            )
        })
        .collect();
    out.sort();
    out
}

async fn league_booking_count(pool: &PgPool, league_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE league_id = $1")
        .bind(league_id)
        .fetch_one(pool)
        .await
        .expect("count bookings")
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn generates_full_round_robin_with_bookings() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C", "D"]).await;
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"
        mutation Generate($leagueId: ID!) {
            generateSchedule(leagueId: $leagueId) {
                leagueId
                matches { id round homeTeamId awayTeamId courtNumber scheduledAt endsAt status }
                byes { round teamId }
            }
        }
        "#,
        Some(Variables::from_json(json!({ "leagueId": league_id.to_string() }))),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let matches = data["generateSchedule"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 6);
    assert!(data["generateSchedule"]["byes"].as_array().unwrap().is_empty());
    assert!(matches.iter().all(|m| m["status"] == "SCHEDULED"));

    let starts: HashSet<_> = matches.iter().map(|m| m["scheduledAt"].to_string()).collect();
    assert!(starts.len() <= 3);

    assert_eq!(league_booking_count(&state.db, league_id).await, 6);
    let participants: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM booking_participants bp
        JOIN bookings b ON b.id = bp.booking_id
        WHERE b.league_id = $1
        "#,
    )
    .bind(league_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    // One player per team, two teams per match.
    assert_eq!(participants, 12);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn second_generate_is_a_conflict() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C"]).await;
    let committer = state.schedule_committer();

    let first = committer
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("first generation");
    assert_eq!(first.matches.len(), 3);
    assert_eq!(first.byes.len(), 3);

    let second = committer.generate(league_id, ScheduleOptions::default()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(league_booking_count(&state.db, league_id).await, 3);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn regenerate_preserving_courts_is_stable() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C", "D"]).await;
    let committer = state.schedule_committer();

    committer
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");
    let before = snapshot(&state.db, league_id).await;

    committer
        .regenerate(
            league_id,
            ScheduleOptions {
                preserve_courts: true,
                match_duration_minutes: None,
            },
        )
        .await
        .expect("regenerate");
    let after = snapshot(&state.db, league_id).await;

    assert_eq!(before, after);
    assert_eq!(league_booking_count(&state.db, league_id).await, 6);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn failed_recheck_leaves_previous_schedule_intact() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C", "D"]).await;

    state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");
    let before = snapshot(&state.db, league_id).await;

    let failing = setup_with_checker(Arc::new(FailingChecker {
        fail_on: 4,
        calls: AtomicUsize::new(0),
    }))
    .await;
    let result = failing
        .schedule_committer()
        .regenerate(
            league_id,
            ScheduleOptions {
                preserve_courts: false,
                match_duration_minutes: Some(45),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(snapshot(&state.db, league_id).await, before);
    assert_eq!(league_booking_count(&state.db, league_id).await, 6);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn schedule_avoids_existing_bookings() {
    let state = setup_test_db().await;
    let (facility_id, league_id, _) = seeded_league(&state.db, 1, &["A", "B"]).await;

    // Someone already holds court 1 from 09:00 to 10:00.
    let court_id: Uuid = sqlx::query_scalar("SELECT id FROM courts WHERE facility_id = $1")
        .bind(facility_id)
        .fetch_one(&state.db)
        .await
        .unwrap();
    let booking_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (facility_id, kind, start_time, end_time)
        VALUES ($1, 'open_play', '2031-03-01 09:00:00+00', '2031-03-01 10:00:00+00')
        RETURNING id
        "#,
    )
    .bind(facility_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO booking_courts (booking_id, court_id, start_time, end_time)
        VALUES ($1, $2, '2031-03-01 09:00:00+00', '2031-03-01 10:00:00+00')
        "#,
    )
    .bind(booking_id)
    .bind(court_id)
    .execute(&state.db)
    .await
    .unwrap();

    let schedule = state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");

    assert_eq!(schedule.matches.len(), 1);
    assert_eq!(
        schedule.matches[0].row.scheduled_at.to_rfc3339(),
        "2031-03-01T10:00:00+00:00"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn missing_league_is_not_found() {
    let state = setup_test_db().await;
    let result = state
        .schedule_committer()
        .generate(Uuid::new_v4(), ScheduleOptions::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn too_few_teams_is_a_validation_error() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["Solo"]).await;
    let result = state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn calendar_subscribers_hear_about_new_schedules() {
    let state = setup_test_db().await;
    let (facility_id, league_id, _) = seeded_league(&state.db, 2, &["A", "B"]).await;
    let mut events = state.calendar().subscribe(facility_id);

    state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");

    let event = events.recv().await.expect("refresh event");
    assert_eq!(event.league_id.as_str(), league_id.to_string());
    assert_eq!(event.match_count, 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn timed_out_regeneration_rolls_back() {
    let state = setup_test_db().await;
    let (facility_id, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C", "D"]).await;

    state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");
    let before = snapshot(&state.db, league_id).await;

    let config = SchedulingConfig {
        generation_timeout: Duration::from_millis(200),
        ..SchedulingConfig::default()
    };
    let slow = AppState::new(setup_pool().await, config).with_availability(Arc::new(SlowChecker {
        delay: Duration::from_secs(2),
    }));
    let mut events = slow.calendar().subscribe(facility_id);

    let result = slow
        .schedule_committer()
        .regenerate(
            league_id,
            ScheduleOptions {
                preserve_courts: false,
                match_duration_minutes: Some(30),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))), "{result:?}");
    assert_eq!(snapshot(&state.db, league_id).await, before);
    assert_eq!(league_booking_count(&state.db, league_id).await, 6);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn concurrent_generations_commit_one_schedule() {
    let state = setup_test_db().await;
    let (_, league_id, _) = seeded_league(&state.db, 2, &["A", "B", "C", "D"]).await;
    let first = state.schedule_committer();
    let second = state.schedule_committer();

    let (a, b) = tokio::join!(
        first.generate(league_id, ScheduleOptions::default()),
        second.generate(league_id, ScheduleOptions::default()),
    );

    let results = [a, b];
    let won = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!((won, conflicts), (1, 1));

    assert_eq!(snapshot(&state.db, league_id).await.len(), 6);
    assert_eq!(league_booking_count(&state.db, league_id).await, 6);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn bookings_list_every_member_of_both_teams() {
    let state = setup_test_db().await;
    let (_, league_id, team_ids) = seeded_league(&state.db, 1, &["Trio", "Solo"]).await;
    let extra = [Uuid::new_v4(), Uuid::new_v4()];
    for user_id in extra {
        add_member(&state.db, team_ids[0], user_id).await;
    }

    let schedule = state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");
    let booking_id = schedule.matches[0].row.booking_id.expect("booking");

    let participants: Vec<Uuid> =
        sqlx::query_scalar("SELECT user_id FROM booking_participants WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_all(&state.db)
            .await
            .unwrap();
    let members: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM team_members WHERE team_id = ANY($1::uuid[])",
    )
    .bind(&team_ids[..])
    .fetch_all(&state.db)
    .await
    .unwrap();

    assert_eq!(participants.len(), 4);
    assert_eq!(
        participants.into_iter().collect::<HashSet<_>>(),
        members.into_iter().collect::<HashSet<_>>()
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn cancelled_bookings_release_their_court() {
    let state = setup_test_db().await;
    let (facility_id, league_id, _) = seeded_league(&state.db, 1, &["A", "B"]).await;

    let court_id: Uuid = sqlx::query_scalar("SELECT id FROM courts WHERE facility_id = $1")
        .bind(facility_id)
        .fetch_one(&state.db)
        .await
        .unwrap();
    let booking_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (facility_id, kind, start_time, end_time)
        VALUES ($1, 'open_play', '2031-03-01 09:00:00+00', '2031-03-01 10:00:00+00')
        RETURNING id
        "#,
    )
    .bind(facility_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO booking_courts (booking_id, court_id, start_time, end_time)
        VALUES ($1, $2, '2031-03-01 09:00:00+00', '2031-03-01 10:00:00+00')
        "#,
    )
    .bind(booking_id)
    .bind(court_id)
    .execute(&state.db)
    .await
    .unwrap();
    sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = $1")
        .bind(booking_id)
        .execute(&state.db)
        .await
        .unwrap();

    let still_active: bool =
        sqlx::query_scalar("SELECT is_active FROM booking_courts WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert!(!still_active);

    let schedule = state
        .schedule_committer()
        .generate(league_id, ScheduleOptions::default())
        .await
        .expect("generate");
    assert_eq!(
        schedule.matches[0].row.scheduled_at.to_rfc3339(),
        "2031-03-01T09:00:00+00:00"
    );
}

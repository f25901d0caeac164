use crate::models::{MatchRow, PairingCourtRow, ScheduledMatchRow};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMatch {
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub booking_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateMatch) -> SqlxResult<MatchRow> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        INSERT INTO matches (league_id, home_team_id, away_team_id, round_number,
                             booking_id, scheduled_at, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'scheduled')
        RETURNING id, league_id, home_team_id, away_team_id, round_number, booking_id,
                  scheduled_at, home_score, away_score, status, created_at, updated_at
        "#,
    )
    .bind(data.league_id)
    .bind(data.home_team_id)
    .bind(data.away_team_id)
    .bind(data.round_number)
    .bind(data.booking_id)
    .bind(data.scheduled_at)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    match_id: Uuid,
) -> SqlxResult<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT id, league_id, home_team_id, away_team_id, round_number, booking_id,
               scheduled_at, home_score, away_score, status, created_at, updated_at
        FROM matches
        WHERE id = $1 AND league_id = $2
        "#,
    )
    .bind(match_id)
    .bind(league_id)
    .fetch_optional(executor)
    .await
}

pub async fn count_by_league<'e>(executor: impl PgExecutor<'e>, league_id: Uuid) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE league_id = $1")
        .bind(league_id)
        .fetch_one(executor)
        .await
}

pub async fn list_booking_ids_by_league<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT booking_id
        FROM matches
        WHERE league_id = $1 AND booking_id IS NOT NULL
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_by_league<'e>(executor: impl PgExecutor<'e>, league_id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM matches WHERE league_id = $1")
        .bind(league_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Persisted schedule, chronological then by court number.
pub async fn list_schedule<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<ScheduledMatchRow>> {
    sqlx::query_as::<_, ScheduledMatchRow>(
        r#"
        SELECT m.id, m.league_id, m.home_team_id, m.away_team_id, m.round_number,
               m.booking_id, m.scheduled_at, b.end_time AS ends_at,
               bc.court_id, c.court_number,
               m.home_score, m.away_score, m.status
        FROM matches m
        LEFT JOIN bookings b ON b.id = m.booking_id
        LEFT JOIN booking_courts bc ON bc.booking_id = m.booking_id
        LEFT JOIN courts c ON c.id = bc.court_id
        WHERE m.league_id = $1
        ORDER BY m.scheduled_at ASC, c.court_number ASC NULLS LAST, m.id ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

/// Court each existing pairing is booked on.
pub async fn list_pairing_courts<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<PairingCourtRow>> {
    sqlx::query_as::<_, PairingCourtRow>(
        r#"
        SELECT m.home_team_id, m.away_team_id, bc.court_id
        FROM matches m
        JOIN booking_courts bc ON bc.booking_id = m.booking_id
        WHERE m.league_id = $1
        ORDER BY m.scheduled_at ASC, m.id ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

pub async fn list_completed_by_league<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT id, league_id, home_team_id, away_team_id, round_number, booking_id,
               scheduled_at, home_score, away_score, status, created_at, updated_at
        FROM matches
        WHERE league_id = $1 AND status = 'completed'
        ORDER BY scheduled_at ASC, id ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

/// Store a final score. The status guard makes this the single transition
/// out of scheduled/in_progress; `None` means no row was in an eligible state.
pub async fn record_result<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    match_id: Uuid,
    home_score: i32,
    away_score: i32,
) -> SqlxResult<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        UPDATE matches
        SET home_score = $3,
            away_score = $4,
            status = 'completed',
            updated_at = NOW()
        WHERE id = $1
          AND league_id = $2
          AND status IN ('scheduled', 'in_progress')
        RETURNING id, league_id, home_team_id, away_team_id, round_number, booking_id,
                  scheduled_at, home_score, away_score, status, created_at, updated_at
        "#,
    )
    .bind(match_id)
    .bind(league_id)
    .bind(home_score)
    .bind(away_score)
    .fetch_optional(executor)
    .await
}

pub async fn mark_in_progress<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    match_id: Uuid,
) -> SqlxResult<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        UPDATE matches
        SET status = 'in_progress',
            updated_at = NOW()
        WHERE id = $1
          AND league_id = $2
          AND status = 'scheduled'
        RETURNING id, league_id, home_team_id, away_team_id, round_number, booking_id,
                  scheduled_at, home_score, away_score, status, created_at, updated_at
        "#,
    )
    .bind(match_id)
    .bind(league_id)
    .fetch_optional(executor)
    .await
}

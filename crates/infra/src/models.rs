use crate::repos::leagues::{LeagueFormat, LeagueStatus};
use crate::repos::matches::MatchStatus;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FacilityRow {
    pub id: Uuid,
    pub name: String,
    pub timezone: String, // IANA zone name, e.g. "Europe/Brussels"
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub court_number: i32,
    pub name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourtRow {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OperatingHoursRow {
    pub facility_id: Uuid,
    pub weekday: i16, // 0 = Monday .. 6 = Sunday
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LeagueRow {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub format: LeagueFormat,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub division_config: serde_json::Value, // JSONB field, opaque to the engine
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub roster_lock_date: Option<NaiveDate>,
    pub status: LeagueStatus,
    pub reservation_kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub captain_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamMemberRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub is_free_agent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub league_id: Option<Uuid>,
    pub kind: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An occupied window on one court, as seen by the availability queries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourtBusyWindowRow {
    pub court_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub booking_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Match joined with its booking window and court, used for schedule listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScheduledMatchRow {
    pub id: Uuid,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub booking_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub court_id: Option<Uuid>,
    pub court_number: Option<i32>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: MatchStatus,
}

/// Court previously used by a pairing; feeds court preservation on regeneration.
#[derive(Debug, Clone, FromRow)]
pub struct PairingCourtRow {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub court_id: Uuid,
}

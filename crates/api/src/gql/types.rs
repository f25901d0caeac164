use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::{MatchRow, ScheduledMatchRow};
use infra::repos::{LeagueStatus as LeagueStatusRow, MatchStatus as MatchStatusRow};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum MatchStatus {
    #[graphql(name = "SCHEDULED")]
    Scheduled,
    #[graphql(name = "IN_PROGRESS")]
    InProgress,
    #[graphql(name = "COMPLETED")]
    Completed,
}

impl From<MatchStatusRow> for MatchStatus {
    fn from(status: MatchStatusRow) -> Self {
        match status {
            MatchStatusRow::Scheduled => MatchStatus::Scheduled,
            MatchStatusRow::InProgress => MatchStatus::InProgress,
            MatchStatusRow::Completed => MatchStatus::Completed,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum LeagueStatus {
    #[graphql(name = "DRAFT")]
    Draft,
    #[graphql(name = "REGISTRATION")]
    Registration,
    #[graphql(name = "ACTIVE")]
    Active,
    #[graphql(name = "COMPLETED")]
    Completed,
    #[graphql(name = "CANCELLED")]
    Cancelled,
}

impl From<LeagueStatusRow> for LeagueStatus {
    fn from(status: LeagueStatusRow) -> Self {
        match status {
            LeagueStatusRow::Draft => LeagueStatus::Draft,
            LeagueStatusRow::Registration => LeagueStatus::Registration,
            LeagueStatusRow::Active => LeagueStatus::Active,
            LeagueStatusRow::Completed => LeagueStatus::Completed,
            LeagueStatusRow::Cancelled => LeagueStatus::Cancelled,
        }
    }
}

/// A league match as stored, with its court and booking window when booked.
#[derive(SimpleObject, Clone, Debug)]
pub struct LeagueMatch {
    pub id: ID,
    pub league_id: ID,
    pub round: i32,
    pub home_team_id: ID,
    pub away_team_id: ID,
    pub booking_id: Option<ID>,
    pub court_id: Option<ID>,
    pub court_number: Option<i32>,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: MatchStatus,
}

impl From<MatchRow> for LeagueMatch {
    fn from(row: MatchRow) -> Self {
        Self {
            id: row.id.into(),
            league_id: row.league_id.into(),
            round: row.round_number,
            home_team_id: row.home_team_id.into(),
            away_team_id: row.away_team_id.into(),
            booking_id: row.booking_id.map(Into::into),
            court_id: None,
            court_number: None,
            scheduled_at: row.scheduled_at,
            ends_at: None,
            home_score: row.home_score,
            away_score: row.away_score,
            status: row.status.into(),
        }
    }
}

impl From<ScheduledMatchRow> for LeagueMatch {
    fn from(row: ScheduledMatchRow) -> Self {
        Self {
            id: row.id.into(),
            league_id: row.league_id.into(),
            round: row.round_number,
            home_team_id: row.home_team_id.into(),
            away_team_id: row.away_team_id.into(),
            booking_id: row.booking_id.map(Into::into),
            court_id: row.court_id.map(Into::into),
            court_number: row.court_number,
            scheduled_at: row.scheduled_at,
            ends_at: row.ends_at,
            home_score: row.home_score,
            away_score: row.away_score,
            status: row.status.into(),
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CalendarRefreshReason {
    #[graphql(name = "SCHEDULE_GENERATED")]
    ScheduleGenerated,
    #[graphql(name = "SCHEDULE_REGENERATED")]
    ScheduleRegenerated,
}

/// Pushed to calendar views of a facility after its bookings changed.
#[derive(SimpleObject, Clone, Debug)]
pub struct CalendarRefresh {
    pub facility_id: ID,
    pub league_id: ID,
    pub reason: CalendarRefreshReason,
    pub match_count: i32,
    pub timestamp: DateTime<Utc>,
}

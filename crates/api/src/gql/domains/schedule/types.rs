use async_graphql::{InputObject, SimpleObject, ID};

use crate::gql::types::{LeagueMatch, MatchStatus};
use crate::scheduling::Bye;

use super::service::{CommittedMatch, CommittedSchedule, ScheduleOptions};

#[derive(InputObject, Default)]
pub struct ScheduleOptionsInput {
    /// Keep each pairing on the court it used before. Regeneration only.
    #[graphql(default = false)]
    pub preserve_courts: bool,
    /// Defaults to the configured match length (60 minutes unless overridden).
    pub match_duration_minutes: Option<i32>,
}

impl ScheduleOptionsInput {
    pub fn into_options(self) -> Result<ScheduleOptions, String> {
        let match_duration_minutes = match self.match_duration_minutes {
            Some(m) if m <= 0 => {
                return Err(format!("matchDurationMinutes must be positive, got {m}"))
            }
            Some(m) => Some(m as u32),
            None => None,
        };
        Ok(ScheduleOptions {
            preserve_courts: self.preserve_courts,
            match_duration_minutes,
        })
    }
}

#[derive(SimpleObject, Clone)]
pub struct ScheduleBye {
    pub round: i32,
    pub team_id: ID,
}

impl From<Bye> for ScheduleBye {
    fn from(bye: Bye) -> Self {
        Self {
            round: bye.round as i32,
            team_id: bye.team_id.into(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GeneratedSchedulePayload {
    pub league_id: ID,
    pub matches: Vec<LeagueMatch>,
    pub byes: Vec<ScheduleBye>,
}

impl From<CommittedMatch> for LeagueMatch {
    fn from(m: CommittedMatch) -> Self {
        let row = m.row;
        Self {
            id: row.id.into(),
            league_id: row.league_id.into(),
            round: row.round_number,
            home_team_id: row.home_team_id.into(),
            away_team_id: row.away_team_id.into(),
            booking_id: row.booking_id.map(Into::into),
            court_id: Some(m.court_id.into()),
            court_number: Some(m.court_number),
            scheduled_at: row.scheduled_at,
            ends_at: Some(m.ends_at),
            home_score: row.home_score,
            away_score: row.away_score,
            status: MatchStatus::from(row.status),
        }
    }
}

impl From<CommittedSchedule> for GeneratedSchedulePayload {
    fn from(schedule: CommittedSchedule) -> Self {
        Self {
            league_id: schedule.league_id.into(),
            matches: schedule.matches.into_iter().map(Into::into).collect(),
            byes: schedule.byes.into_iter().map(Into::into).collect(),
        }
    }
}

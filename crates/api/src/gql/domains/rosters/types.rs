use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};

use infra::models::TeamMemberRow;

use super::service;

#[derive(SimpleObject, Clone)]
pub struct TeamMember {
    pub id: ID,
    pub team_id: ID,
    pub user_id: ID,
    pub is_free_agent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: row.id.into(),
            team_id: row.team_id.into(),
            user_id: row.user_id.into(),
            is_free_agent: row.is_free_agent,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct RosterStatus {
    pub league_id: ID,
    pub timezone: String,
    pub lock_date: Option<NaiveDate>,
    /// UTC instant of local midnight on the lock date.
    pub locks_at: Option<DateTime<Utc>>,
    pub locked: bool,
}

impl From<service::RosterStatus> for RosterStatus {
    fn from(s: service::RosterStatus) -> Self {
        Self {
            league_id: s.league_id.into(),
            timezone: s.timezone,
            lock_date: s.lock_date,
            locks_at: s.locks_at,
            locked: s.locked,
        }
    }
}

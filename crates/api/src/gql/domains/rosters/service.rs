use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use infra::models::{LeagueRow, TeamMemberRow, TeamRow};
use infra::repos::{facilities, leagues, team_members, teams, CreateTeamMember};

use crate::error::AppError;
use crate::scheduling::{is_roster_locked, lock_instant, parse_timezone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterStatus {
    pub league_id: Uuid,
    pub timezone: String,
    pub lock_date: Option<NaiveDate>,
    pub locks_at: Option<DateTime<Utc>>,
    pub locked: bool,
}

pub async fn roster_status(
    pool: &PgPool,
    league_id: Uuid,
    now: DateTime<Utc>,
) -> Result<RosterStatus, AppError> {
    let league = leagues::get_by_id(pool, league_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("League {league_id} not found")))?;
    let facility = facilities::get_by_id(pool, league.facility_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Facility {} not found", league.facility_id)))?;
    let tz = parse_timezone(&facility.timezone)?;

    Ok(RosterStatus {
        league_id,
        timezone: facility.timezone,
        lock_date: league.roster_lock_date,
        locks_at: league.roster_lock_date.and_then(|d| lock_instant(d, tz)),
        locked: is_roster_locked(league.roster_lock_date, tz, now),
    })
}

pub async fn add_team_member(
    pool: &PgPool,
    team_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<TeamMemberRow, AppError> {
    let mut tx = pool.begin().await?;
    let (team, league) = lock_unlocked_roster(&mut tx, team_id, now).await?;

    if team_members::find_team_in_league(&mut *tx, league.id, user_id).await? == Some(team.id) {
        return Err(AppError::conflict(format!(
            "User {user_id} is already on team {}",
            team.name
        )));
    }
    ensure_capacity(&mut tx, &team, &league).await?;

    let member = team_members::create(
        &mut *tx,
        CreateTeamMember {
            team_id,
            user_id,
            is_free_agent: false,
        },
    )
    .await?;
    tx.commit().await?;

    info!(team_id = %team_id, user_id = %user_id, "team member added");
    Ok(member)
}

pub async fn remove_team_member(
    pool: &PgPool,
    team_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    lock_unlocked_roster(&mut tx, team_id, now).await?;

    if !team_members::delete(&mut *tx, team_id, user_id).await? {
        return Err(AppError::not_found(format!(
            "User {user_id} is not a member of team {team_id}"
        )));
    }
    tx.commit().await?;

    info!(team_id = %team_id, user_id = %user_id, "team member removed");
    Ok(())
}

/// Place an unattached player on a team. The player must not already play
/// for any team in the same league.
pub async fn assign_free_agent(
    pool: &PgPool,
    team_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<TeamMemberRow, AppError> {
    let mut tx = pool.begin().await?;
    let (team, league) = lock_unlocked_roster(&mut tx, team_id, now).await?;

    if let Some(current) = team_members::find_team_in_league(&mut *tx, league.id, user_id).await? {
        return Err(AppError::conflict(format!(
            "User {user_id} already plays for team {current} in this league"
        )));
    }
    ensure_capacity(&mut tx, &team, &league).await?;

    let member = team_members::create(
        &mut *tx,
        CreateTeamMember {
            team_id,
            user_id,
            is_free_agent: true,
        },
    )
    .await?;
    tx.commit().await?;

    info!(team_id = %team_id, user_id = %user_id, "free agent assigned");
    Ok(member)
}

/// Lock the team row and fail with a conflict when its league's roster is
/// locked at `now` in the facility's timezone.
async fn lock_unlocked_roster(
    conn: &mut PgConnection,
    team_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(TeamRow, LeagueRow), AppError> {
    let team = teams::get_for_update(&mut *conn, team_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {team_id} not found")))?;
    let league = leagues::get_by_id(&mut *conn, team.league_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("League {} not found", team.league_id)))?;
    let facility = facilities::get_by_id(&mut *conn, league.facility_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Facility {} not found", league.facility_id)))?;
    let tz = parse_timezone(&facility.timezone)?;

    if is_roster_locked(league.roster_lock_date, tz, now) {
        let date = league
            .roster_lock_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        return Err(AppError::conflict(format!(
            "Roster for league {} is locked since {date}",
            league.name
        )));
    }

    Ok((team, league))
}

async fn ensure_capacity(
    conn: &mut PgConnection,
    team: &TeamRow,
    league: &LeagueRow,
) -> Result<(), AppError> {
    let size = team_members::count_by_team(&mut *conn, team.id).await?;
    if size >= i64::from(league.max_team_size) {
        return Err(AppError::conflict(format!(
            "Team {} is full ({} of {} players)",
            team.name, size, league.max_team_size
        )));
    }
    Ok(())
}

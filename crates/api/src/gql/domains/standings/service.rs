use sqlx::PgPool;
use uuid::Uuid;

use infra::repos::{leagues, matches, teams};

use crate::error::AppError;
use crate::scheduling::{compute_standings, standings_to_csv, MatchScore, TeamRef, TeamStanding};

/// Ranked standings over every completed match of the league. Every team of
/// the league is listed, including ones that have not played yet.
pub async fn get_standings(pool: &PgPool, league_id: Uuid) -> Result<Vec<TeamStanding>, AppError> {
    leagues::get_by_id(pool, league_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("League {league_id} not found")))?;

    let team_refs: Vec<TeamRef> = teams::list_by_league(pool, league_id)
        .await?
        .into_iter()
        .map(|t| TeamRef {
            id: t.id,
            name: t.name,
        })
        .collect();

    let scores: Vec<MatchScore> = matches::list_completed_by_league(pool, league_id)
        .await?
        .into_iter()
        .filter_map(|m| {
            Some(MatchScore {
                home_team_id: m.home_team_id,
                away_team_id: m.away_team_id,
                home_score: m.home_score?,
                away_score: m.away_score?,
            })
        })
        .collect();

    Ok(compute_standings(&team_refs, &scores))
}

pub async fn export_standings_csv(pool: &PgPool, league_id: Uuid) -> Result<String, AppError> {
    let standings = get_standings(pool, league_id).await?;
    Ok(standings_to_csv(&standings))
}

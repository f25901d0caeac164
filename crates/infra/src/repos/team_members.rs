use crate::models::TeamMemberRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateTeamMember {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub is_free_agent: bool,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateTeamMember,
) -> SqlxResult<TeamMemberRow> {
    sqlx::query_as::<_, TeamMemberRow>(
        r#"
        INSERT INTO team_members (team_id, user_id, is_free_agent)
        VALUES ($1, $2, $3)
        RETURNING id, team_id, user_id, is_free_agent, created_at
        "#,
    )
    .bind(data.team_id)
    .bind(data.user_id)
    .bind(data.is_free_agent)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e>(
    executor: impl PgExecutor<'e>,
    team_id: Uuid,
    user_id: Uuid,
) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
        .bind(team_id)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_by_team<'e>(executor: impl PgExecutor<'e>, team_id: Uuid) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
        .bind(team_id)
        .fetch_one(executor)
        .await
}

/// `(team_id, user_id)` for every member of the given teams, grouped by
/// team. Used to fill booking participants.
pub async fn list_members_by_teams<'e>(
    executor: impl PgExecutor<'e>,
    team_ids: &[Uuid],
) -> SqlxResult<Vec<(Uuid, Uuid)>> {
    if team_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, (Uuid, Uuid)>(
        r#"
        SELECT team_id, user_id
        FROM team_members
        WHERE team_id = ANY($1::uuid[])
        ORDER BY team_id, user_id
        "#,
    )
    .bind(team_ids)
    .fetch_all(executor)
    .await
}

/// Team the user already plays for in the given league, if any.
pub async fn find_team_in_league<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
    user_id: Uuid,
) -> SqlxResult<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT tm.team_id
        FROM team_members tm
        JOIN teams t ON t.id = tm.team_id
        WHERE t.league_id = $1 AND tm.user_id = $2
        LIMIT 1
        "#,
    )
    .bind(league_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

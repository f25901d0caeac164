use crate::models::TeamRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

pub async fn list_by_league<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT id, league_id, name, captain_id, status, created_at, updated_at
        FROM teams
        WHERE league_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

/// Active teams in a stable order (creation time, then id). The schedule
/// generator relies on this order being repeatable.
pub async fn list_active_by_league<'e>(
    executor: impl PgExecutor<'e>,
    league_id: Uuid,
) -> SqlxResult<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT id, league_id, name, captain_id, status, created_at, updated_at
        FROM teams
        WHERE league_id = $1 AND status = 'active'
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(league_id)
    .fetch_all(executor)
    .await
}

/// Lock the team row so membership changes on one team run one at a time.
pub async fn get_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT id, league_id, name, captain_id, status, created_at, updated_at
        FROM teams
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

use crate::models::LeagueRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "league_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeagueStatus {
    Draft,
    Registration,
    Active,
    Completed,
    Cancelled,
}

impl LeagueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueStatus::Draft => "draft",
            LeagueStatus::Registration => "registration",
            LeagueStatus::Active => "active",
            LeagueStatus::Completed => "completed",
            LeagueStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "league_format", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeagueFormat {
    Singles,
    Doubles,
    Mixed,
}

const LEAGUE_COLUMNS: &str = r#"
    id, facility_id, name, format, start_date, end_date, division_config,
    min_team_size, max_team_size, roster_lock_date, status, reservation_kind,
    created_at, updated_at
"#;

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<LeagueRow>> {
    let query = format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1");
    sqlx::query_as::<_, LeagueRow>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Fetch the league and hold a row lock on it until the transaction ends.
/// Schedule generation uses this to serialize concurrent requests per league.
pub async fn get_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<LeagueRow>> {
    let query = format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, LeagueRow>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}


use async_graphql::{Context, Object, Result, ID};

use crate::gql::error::{parse_id, AppResultExt};
use crate::state::AppState;

use super::service;
use super::types::TeamStanding;

#[derive(Default)]
pub struct StandingsQuery;

#[Object]
impl StandingsQuery {
    /// Teams ranked by wins, point differential, then points for.
    async fn league_standings(&self, ctx: &Context<'_>, league_id: ID) -> Result<Vec<TeamStanding>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        let standings = service::get_standings(&state.db, league_id)
            .await
            .into_gql()?;
        Ok(standings.into_iter().map(Into::into).collect())
    }

    /// Standings as CSV text, header row first.
    async fn league_standings_csv(&self, ctx: &Context<'_>, league_id: ID) -> Result<String> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        service::export_standings_csv(&state.db, league_id)
            .await
            .into_gql()
    }
}

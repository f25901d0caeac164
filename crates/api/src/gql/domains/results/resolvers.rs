use async_graphql::{Context, Object, Result, ID};

use crate::gql::error::{parse_id, AppResultExt};
use crate::gql::types::LeagueMatch;
use crate::state::AppState;

use super::service;
use super::types::RecordResultInput;

#[derive(Default)]
pub struct ResultMutation;

#[Object]
impl ResultMutation {
    /// Record the final score of a match and mark it completed.
    async fn record_result(&self, ctx: &Context<'_>, input: RecordResultInput) -> Result<LeagueMatch> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&input.league_id, "league")?;
        let match_id = parse_id(&input.match_id, "match")?;

        let row = service::record_result(
            &state.db,
            league_id,
            match_id,
            input.home_score,
            input.away_score,
        )
        .await
        .into_gql()?;
        Ok(row.into())
    }

    async fn start_match(&self, ctx: &Context<'_>, league_id: ID, match_id: ID) -> Result<LeagueMatch> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;
        let match_id = parse_id(&match_id, "match")?;

        let row = service::start_match(&state.db, league_id, match_id)
            .await
            .into_gql()?;
        Ok(row.into())
    }
}

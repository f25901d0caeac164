use async_graphql::{Context, Object, Result, ID};
use chrono::Utc;

use crate::gql::error::{parse_id, AppResultExt};
use crate::state::AppState;

use super::service;
use super::types::{RosterStatus, TeamMember};

#[derive(Default)]
pub struct RosterQuery;

#[Object]
impl RosterQuery {
    async fn roster_status(&self, ctx: &Context<'_>, league_id: ID) -> Result<RosterStatus> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        let status = service::roster_status(&state.db, league_id, Utc::now())
            .await
            .into_gql()?;
        Ok(status.into())
    }
}

#[derive(Default)]
pub struct RosterMutation;

#[Object]
impl RosterMutation {
    async fn add_team_member(&self, ctx: &Context<'_>, team_id: ID, user_id: ID) -> Result<TeamMember> {
        let state = ctx.data::<AppState>()?;
        let team_id = parse_id(&team_id, "team")?;
        let user_id = parse_id(&user_id, "user")?;

        let member = service::add_team_member(&state.db, team_id, user_id, Utc::now())
            .await
            .into_gql()?;
        Ok(member.into())
    }

    async fn remove_team_member(&self, ctx: &Context<'_>, team_id: ID, user_id: ID) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let team_id = parse_id(&team_id, "team")?;
        let user_id = parse_id(&user_id, "user")?;

        service::remove_team_member(&state.db, team_id, user_id, Utc::now())
            .await
            .into_gql()?;
        Ok(true)
    }

    async fn assign_free_agent(&self, ctx: &Context<'_>, team_id: ID, user_id: ID) -> Result<TeamMember> {
        let state = ctx.data::<AppState>()?;
        let team_id = parse_id(&team_id, "team")?;
        let user_id = parse_id(&user_id, "user")?;

        let member = service::assign_free_agent(&state.db, team_id, user_id, Utc::now())
            .await
            .into_gql()?;
        Ok(member.into())
    }
}

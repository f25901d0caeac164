use async_graphql::{Context, Object, Result, ID};

use crate::error::AppError;
use crate::gql::error::{parse_id, AppResultExt};
use crate::gql::types::LeagueMatch;
use crate::state::AppState;

use super::service;
use super::types::{GeneratedSchedulePayload, ScheduleOptionsInput};

#[derive(Default)]
pub struct ScheduleQuery;

#[Object]
impl ScheduleQuery {
    /// Persisted schedule of a league, chronological then by court number.
    async fn league_schedule(&self, ctx: &Context<'_>, league_id: ID) -> Result<Vec<LeagueMatch>> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;

        let rows = service::league_schedule(&state.db, league_id)
            .await
            .into_gql()?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct ScheduleMutation;

#[Object]
impl ScheduleMutation {
    /// Build and persist the round-robin schedule. Fails with CONFLICT when
    /// the league already has one.
    async fn generate_schedule(
        &self,
        ctx: &Context<'_>,
        league_id: ID,
        options: Option<ScheduleOptionsInput>,
    ) -> Result<GeneratedSchedulePayload> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;
        let options = options
            .unwrap_or_default()
            .into_options()
            .map_err(AppError::Validation)
            .into_gql()?;

        let schedule = state
            .schedule_committer()
            .generate(league_id, options)
            .await
            .into_gql()?;
        Ok(schedule.into())
    }

    /// Replace the league's schedule atomically.
    async fn regenerate_schedule(
        &self,
        ctx: &Context<'_>,
        league_id: ID,
        options: Option<ScheduleOptionsInput>,
    ) -> Result<GeneratedSchedulePayload> {
        let state = ctx.data::<AppState>()?;
        let league_id = parse_id(&league_id, "league")?;
        let options = options
            .unwrap_or_default()
            .into_options()
            .map_err(AppError::Validation)
            .into_gql()?;

        let schedule = state
            .schedule_committer()
            .regenerate(league_id, options)
            .await
            .into_gql()?;
        Ok(schedule.into())
    }
}

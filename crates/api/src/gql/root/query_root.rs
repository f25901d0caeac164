use async_graphql::MergedObject;

use crate::gql::domains::rosters::RosterQuery;
use crate::gql::domains::schedule::ScheduleQuery;
use crate::gql::domains::standings::StandingsQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(RosterQuery, ScheduleQuery, StandingsQuery);

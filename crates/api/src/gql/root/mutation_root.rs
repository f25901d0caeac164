use async_graphql::MergedObject;

use crate::gql::domains::results::ResultMutation;
use crate::gql::domains::rosters::RosterMutation;
use crate::gql::domains::schedule::ScheduleMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(ResultMutation, RosterMutation, ScheduleMutation);

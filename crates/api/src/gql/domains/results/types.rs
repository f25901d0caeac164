use async_graphql::{InputObject, ID};

#[derive(InputObject)]
pub struct RecordResultInput {
    pub league_id: ID,
    pub match_id: ID,
    pub home_score: i32,
    pub away_score: i32,
}
